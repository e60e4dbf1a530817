// file: src/tracking/error.rs
// description: error types for production tracking calls
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tracking API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response is missing '{0}'")]
    MissingField(String),

    #[error("Cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}
