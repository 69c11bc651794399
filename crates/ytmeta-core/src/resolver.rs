//! Language-preference fallback for transcript selection.
//!
//! Resolution walks an ordered chain of phases: each caller-preferred
//! language code in turn, then any manually created track, then any
//! auto-generated one. The first phase that yields a fetchable track wins;
//! a miss advances the chain. Candidate selection is pure over the track
//! listing so the precedence rules are testable without the network.

use log::warn;

use crate::{
    transcript::{CaptionTrack, TranscriptClient},
    types::Transcript,
};

/// Current position in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Trying the i-th caller-preferred language code. Manual tracks take
    /// priority over auto-generated ones for that exact code.
    Preferred(usize),
    /// Any manually created track, in listing order.
    AnyManual,
    /// Any auto-generated track, in listing order.
    AnyAuto,
    /// Nothing left to try.
    Exhausted,
}

impl Phase {
    pub fn start(preferred_len: usize) -> Self {
        if preferred_len == 0 {
            Phase::AnyManual
        } else {
            Phase::Preferred(0)
        }
    }

    pub fn advance(self, preferred_len: usize) -> Self {
        match self {
            Phase::Preferred(i) if i + 1 < preferred_len => Phase::Preferred(i + 1),
            Phase::Preferred(_) => Phase::AnyManual,
            Phase::AnyManual => Phase::AnyAuto,
            Phase::AnyAuto | Phase::Exhausted => Phase::Exhausted,
        }
    }

    /// The track this phase would fetch, or `None` on a miss.
    pub fn candidate<'a>(
        &self,
        tracks: &'a [CaptionTrack],
        preferred: &[String],
    ) -> Option<&'a CaptionTrack> {
        match self {
            Phase::Preferred(i) => {
                let lang = preferred.get(*i)?;
                tracks
                    .iter()
                    .find(|t| !t.is_generated() && t.language_code == *lang)
                    .or_else(|| {
                        tracks
                            .iter()
                            .find(|t| t.is_generated() && t.language_code == *lang)
                    })
            }
            Phase::AnyManual => tracks.iter().find(|t| !t.is_generated()),
            Phase::AnyAuto => tracks.iter().find(|t| t.is_generated()),
            Phase::Exhausted => None,
        }
    }
}

/// Terminal outcome of transcript resolution. `Unavailable` is a normal
/// result, not an error: the run continues without transcript fields.
#[derive(Debug)]
pub enum TranscriptOutcome {
    Found(Transcript),
    /// No usable transcript. Carries whatever the listing reported so the
    /// caller can show which languages do exist (possibly none).
    Unavailable { available: Vec<CaptionTrack> },
}

/// Resolve the best-available transcript for `video_id` given an ordered
/// language preference list.
///
/// Every failure on this path (listing, fetch, empty track) degrades to
/// the `Unavailable` outcome or advances the chain; nothing here aborts
/// the caller's run.
pub async fn resolve_transcript(
    client: &TranscriptClient,
    video_id: &str,
    preferred: &[String],
) -> TranscriptOutcome {
    let tracks = match client.list_caption_tracks(video_id).await {
        Ok(tracks) => tracks,
        Err(e) => {
            warn!("caption listing failed for {video_id}: {e}");
            return TranscriptOutcome::Unavailable {
                available: Vec::new(),
            };
        }
    };

    let mut phase = Phase::start(preferred.len());
    loop {
        if phase == Phase::Exhausted {
            return TranscriptOutcome::Unavailable { available: tracks };
        }

        if let Some(track) = phase.candidate(&tracks, preferred) {
            match client.fetch_track(track).await {
                Ok(segments) if !segments.is_empty() => {
                    return TranscriptOutcome::Found(Transcript {
                        language: track.language_code.clone(),
                        segments,
                    });
                }
                Ok(_) => warn!(
                    "empty transcript for {video_id} ({})",
                    track.language_code
                ),
                Err(e) => warn!(
                    "transcript fetch failed for {video_id} ({}): {e}",
                    track.language_code
                ),
            }
        }

        phase = phase.advance(preferred.len());
    }
}
