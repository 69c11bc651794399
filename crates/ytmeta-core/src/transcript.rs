//! Caption track listing and fetching against YouTube's Innertube API.
//!
//! One POST to the player endpoint lists the available tracks (tagged
//! manual vs auto-generated); one GET per track retrieves its cues in the
//! `json3` timedtext format.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{error::Result, types::Segment};

const PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player";
const ANDROID_CLIENT_VERSION: &str = "20.10.38";
const ANDROID_USER_AGENT: &str =
    "com.google.android.youtube/20.10.38 (Linux; U; Android 11) gzip";

/// One caption track as listed by the player response, in upstream order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    #[serde(default)]
    pub name: Option<TrackName>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_translatable: bool,
}

impl CaptionTrack {
    /// Auto-generated (ASR) tracks are tagged `kind: "asr"` upstream;
    /// everything else was manually created.
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    /// Human-readable track name, falling back to the language code.
    pub fn label(&self) -> &str {
        self.name
            .as_ref()
            .and_then(TrackName::text)
            .unwrap_or(&self.language_code)
    }
}

/// Track names come back as either `simpleText` or a `runs` list depending
/// on the Innertube client that answered.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackName {
    #[serde(default)]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Option<Vec<NameRun>>,
}

#[derive(Debug, Clone, Deserialize)]
struct NameRun {
    text: String,
}

impl TrackName {
    fn text(&self) -> Option<&str> {
        self.simple_text
            .as_deref()
            .or_else(|| Some(self.runs.as_ref()?.first()?.text.as_str()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    #[serde(default)]
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    #[serde(default)]
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    #[serde(default)]
    segs: Option<Vec<TimedTextSeg>>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: Option<String>,
}

/// Transcript listing/fetch client. The player endpoint is injectable so
/// tests can point it at a local mock server.
pub struct TranscriptClient {
    http: Client,
    player_endpoint: String,
}

impl Default for TranscriptClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptClient {
    pub fn new() -> Self {
        Self::with_player_endpoint(PLAYER_ENDPOINT.to_string())
    }

    pub fn with_player_endpoint(player_endpoint: String) -> Self {
        Self {
            http: Client::new(),
            player_endpoint,
        }
    }

    /// List the caption tracks for a video, preserving upstream listing
    /// order. A video with captions disabled yields an empty list, not an
    /// error.
    pub async fn list_caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": ANDROID_CLIENT_VERSION,
                    "androidSdkVersion": 30,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .http
            .post(&self.player_endpoint)
            .header("User-Agent", ANDROID_USER_AGENT)
            .query(&[("prettyPrint", "false")])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<PlayerResponse>()
            .await?;

        Ok(response
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .map(|renderer| renderer.caption_tracks)
            .unwrap_or_default())
    }

    /// Fetch one track's cues and parse them into ordered segments.
    pub async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<Segment>> {
        let timed: TimedText = self
            .http
            .get(&track.base_url)
            .header("User-Agent", ANDROID_USER_AGENT)
            .query(&[("fmt", "json3")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(segments_from_events(timed.events))
    }
}

/// Events without renderable text (style windows, placeholders) are
/// dropped; newlines inside a cue are flattened to spaces.
fn segments_from_events(events: Vec<TimedTextEvent>) -> Vec<Segment> {
    events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let text = segs
                .iter()
                .filter_map(|s| s.utf8.as_deref())
                .collect::<String>()
                .replace('\n', " ")
                .trim()
                .to_string();
            if text.is_empty() {
                return None;
            }
            Some(Segment {
                start: event.start_ms as f64 / 1000.0,
                duration: event.duration_ms as f64 / 1000.0,
                text,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asr_kind_marks_generated_tracks() {
        let track: CaptionTrack = serde_json::from_value(json!({
            "baseUrl": "https://example.invalid/api/timedtext?lang=en",
            "languageCode": "en",
            "kind": "asr",
            "name": {"runs": [{"text": "English (auto-generated)"}]},
            "isTranslatable": true
        }))
        .unwrap();

        assert!(track.is_generated());
        assert!(track.is_translatable);
        assert_eq!(track.label(), "English (auto-generated)");
    }

    #[test]
    fn manual_tracks_have_no_kind() {
        let track: CaptionTrack = serde_json::from_value(json!({
            "baseUrl": "https://example.invalid/api/timedtext?lang=hi",
            "languageCode": "hi",
            "name": {"simpleText": "Hindi"}
        }))
        .unwrap();

        assert!(!track.is_generated());
        assert_eq!(track.label(), "Hindi");
    }

    #[test]
    fn label_falls_back_to_language_code() {
        let track: CaptionTrack = serde_json::from_value(json!({
            "baseUrl": "https://example.invalid/api/timedtext?lang=de",
            "languageCode": "de"
        }))
        .unwrap();

        assert_eq!(track.label(), "de");
    }

    #[test]
    fn events_become_ordered_segments() {
        let timed: TimedText = serde_json::from_value(json!({
            "events": [
                {"tStartMs": 0, "dDurationMs": 2000, "segs": [{"utf8": "Never gonna"}, {"utf8": " give"}]},
                {"tStartMs": 2000, "dDurationMs": 1500, "segs": [{"utf8": "you\nup"}]}
            ]
        }))
        .unwrap();

        let segments = segments_from_events(timed.events);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].duration, 2.0);
        assert_eq!(segments[0].text, "Never gonna give");
        assert_eq!(segments[1].text, "you up");
    }

    #[test]
    fn textless_events_are_dropped() {
        let timed: TimedText = serde_json::from_value(json!({
            "events": [
                {"tStartMs": 0, "dDurationMs": 100},
                {"tStartMs": 0, "dDurationMs": 100, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 100, "dDurationMs": 900, "segs": [{"utf8": "hello"}]}
            ]
        }))
        .unwrap();

        let segments = segments_from_events(timed.events);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "hello");
    }

    // Each test mocks its own endpoint path: mockito's server is shared
    // across the test binary and same-path mocks would collide.
    #[tokio::test]
    async fn lists_tracks_from_player_response() {
        let _mock = mockito::mock("POST", "/list-tracks/youtubei/v1/player")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "captions": {
                        "playerCaptionsTracklistRenderer": {
                            "captionTracks": [
                                {
                                    "baseUrl": "https://example.invalid/api/timedtext?lang=en",
                                    "languageCode": "en",
                                    "kind": "asr",
                                    "name": {"runs": [{"text": "English (auto-generated)"}]},
                                    "isTranslatable": true
                                },
                                {
                                    "baseUrl": "https://example.invalid/api/timedtext?lang=hi",
                                    "languageCode": "hi",
                                    "name": {"simpleText": "Hindi"}
                                }
                            ]
                        }
                    }
                })
                .to_string(),
            )
            .create();

        let client = TranscriptClient::with_player_endpoint(format!(
            "{}/list-tracks/youtubei/v1/player",
            mockito::server_url()
        ));

        let tracks = client.list_caption_tracks("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "en");
        assert!(tracks[0].is_generated());
        assert_eq!(tracks[1].language_code, "hi");
        assert!(!tracks[1].is_generated());
    }

    #[tokio::test]
    async fn captions_disabled_yields_empty_listing() {
        let _mock = mockito::mock("POST", "/no-captions/youtubei/v1/player")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"playabilityStatus": {"status": "OK"}}).to_string())
            .create();

        let client = TranscriptClient::with_player_endpoint(format!(
            "{}/no-captions/youtubei/v1/player",
            mockito::server_url()
        ));

        let tracks = client.list_caption_tracks("IN9PW8GRgKo").await.unwrap();
        assert!(tracks.is_empty());
    }
}
