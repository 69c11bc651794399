use serde::{Deserialize, Serialize};

/// Descriptive fields for a single video, as reported by yt-dlp.
///
/// `video_id` comes from our own URL parsing; everything else is nullable
/// because the extractor omits fields it could not determine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub views: Option<u64>,
    pub publish_date: Option<String>,
    pub length: Option<u64>,
    pub author: Option<String>,
    pub channel_id: Option<String>,
    pub channel_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub likes: Option<u64>,
}

/// One timed caption cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

/// A resolved transcript: the matched language plus its ordered segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Space-joined segment texts, for callers that want plain prose.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The three transcript keys appear together or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptBlock {
    pub transcript: Vec<Segment>,
    pub transcript_language: String,
    pub transcript_text: String,
}

/// The merged output record: metadata fields plus, when a transcript was
/// resolved, the flattened transcript block. When no transcript exists the
/// block is `None` and its keys are omitted from the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(flatten)]
    pub metadata: VideoMetadata,
    #[serde(flatten)]
    pub transcript: Option<TranscriptBlock>,
}

impl VideoRecord {
    pub fn new(metadata: VideoMetadata) -> Self {
        Self {
            metadata,
            transcript: None,
        }
    }

    pub fn with_transcript(metadata: VideoMetadata, transcript: Transcript) -> Self {
        let transcript_text = transcript.full_text();
        Self {
            metadata,
            transcript: Some(TranscriptBlock {
                transcript: transcript.segments,
                transcript_language: transcript.language,
                transcript_text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> VideoMetadata {
        VideoMetadata {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: Some("Never Gonna Give You Up".to_string()),
            description: Some("Official video".to_string()),
            views: Some(1_500_000_000),
            publish_date: Some("20091025".to_string()),
            length: Some(212),
            author: Some("Rick Astley".to_string()),
            channel_id: Some("UCuAXFkgsw1L7xaCfnd5JJOw".to_string()),
            channel_url: Some("https://www.youtube.com/channel/UCuAXFkgsw1L7xaCfnd5JJOw".to_string()),
            thumbnail_url: None,
            categories: Some(vec!["Music".to_string()]),
            tags: Some(vec!["rick astley".to_string(), "80s".to_string()]),
            likes: None,
        }
    }

    fn transcript() -> Transcript {
        Transcript {
            language: "en".to_string(),
            segments: vec![
                Segment {
                    start: 0.0,
                    duration: 1.5,
                    text: "Never gonna give".to_string(),
                },
                Segment {
                    start: 1.5,
                    duration: 2.0,
                    text: "you up".to_string(),
                },
            ],
        }
    }

    #[test]
    fn full_text_joins_segments_with_spaces() {
        assert_eq!(transcript().full_text(), "Never gonna give you up");
    }

    #[test]
    fn transcript_keys_absent_without_transcript() {
        let record = VideoRecord::new(metadata());
        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("transcript"));
        assert!(!object.contains_key("transcript_language"));
        assert!(!object.contains_key("transcript_text"));
        assert_eq!(object["video_id"], "dQw4w9WgXcQ");
        // Missing metadata values serialize as null, not as absent keys.
        assert!(object["likes"].is_null());
    }

    #[test]
    fn transcript_keys_all_present_with_transcript() {
        let record = VideoRecord::with_transcript(metadata(), transcript());
        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object["transcript_language"], "en");
        assert_eq!(object["transcript_text"], "Never gonna give you up");
        assert_eq!(object["transcript"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn record_round_trips_without_transcript() {
        let record = VideoRecord::new(metadata());
        let json = serde_json::to_string(&record).unwrap();
        let parsed: VideoRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        assert!(parsed.transcript.is_none());
    }

    #[test]
    fn record_round_trips_with_transcript() {
        let record = VideoRecord::with_transcript(metadata(), transcript());
        let json = serde_json::to_string(&record).unwrap();
        let parsed: VideoRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
