use thiserror::Error;

#[derive(Error, Debug)]
pub enum YtmetaError {
    #[error("Could not extract a video id from {input:?}")]
    InvalidUrl { input: String },

    #[error("Metadata fetch failed for {url}: {reason}")]
    MetadataFetch { url: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Caption request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, YtmetaError>;
