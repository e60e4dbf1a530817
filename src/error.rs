// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use crate::pipeline::PipelineState;
use crate::render::RenderError;
use crate::tracking::TrackingError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No frame sequence found for {requested}")]
    SequenceNotFound { requested: PathBuf },

    #[error("Publish lookup failed for id {publish_id}: {reason}")]
    PublishLookup { publish_id: u64, reason: String },

    #[error("Publish record is missing required field '{0}'")]
    SlateField(&'static str),

    #[error("Scene setup failed while {stage}: {source}")]
    SceneBuild {
        stage: PipelineState,
        #[source]
        source: RenderError,
    },

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Tracking write '{operation}' failed: {source}")]
    TrackingWrite {
        operation: &'static str,
        version_id: Option<u64>,
        #[source]
        source: TrackingError,
    },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn scene_build(stage: PipelineState, source: RenderError) -> Self {
        Self::SceneBuild { stage, source }
    }

    pub fn tracking_write(
        operation: &'static str,
        version_id: Option<u64>,
        source: TrackingError,
    ) -> Self {
        Self::TrackingWrite {
            operation,
            version_id,
            source,
        }
    }

    /// True for errors raised after a tracking record may already exist.
    pub fn left_partial_state(&self) -> bool {
        matches!(
            self,
            Self::TrackingWrite {
                version_id: Some(_),
                ..
            }
        )
    }
}
