use serde::Deserialize;
use tokio::process::Command;

use crate::{
    error::{Result, YtmetaError},
    types::VideoMetadata,
};

/// Subset of the yt-dlp `--dump-json` payload we keep. Unknown fields are
/// ignored; the payload carries hundreds of them.
#[derive(Debug, Deserialize)]
struct RawVideoInfo {
    title: Option<String>,
    description: Option<String>,
    view_count: Option<u64>,
    upload_date: Option<String>,
    duration: Option<f64>,
    uploader: Option<String>,
    channel_id: Option<String>,
    channel_url: Option<String>,
    thumbnail: Option<String>,
    categories: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    like_count: Option<u64>,
}

/// Fetch video metadata using yt-dlp. One attempt, no retries; a failed
/// fetch is fatal for the whole run.
///
/// `video_id` is the id we extracted from the input ourselves; it seeds the
/// record rather than anything from the yt-dlp payload.
pub async fn fetch_metadata(url: &str, video_id: &str) -> Result<VideoMetadata> {
    let output = Command::new("yt-dlp")
        .arg("--dump-json")
        .arg("--no-playlist")
        .arg("--no-warnings")
        .arg("--skip-download")
        .arg(url)
        .output()
        .await?;

    if !output.status.success() {
        return Err(YtmetaError::MetadataFetch {
            url: url.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    parse_metadata(&output.stdout, video_id)
}

fn parse_metadata(payload: &[u8], video_id: &str) -> Result<VideoMetadata> {
    let raw: RawVideoInfo = serde_json::from_slice(payload)?;

    Ok(VideoMetadata {
        video_id: video_id.to_string(),
        title: raw.title,
        description: raw.description,
        views: raw.view_count,
        publish_date: raw.upload_date,
        length: raw.duration.map(|seconds| seconds as u64),
        author: raw.uploader,
        channel_id: raw.channel_id,
        channel_url: raw.channel_url,
        thumbnail_url: raw.thumbnail,
        categories: raw.categories,
        tags: raw.tags,
        likes: raw.like_count,
    })
}
