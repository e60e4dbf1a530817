// file: src/render/error.rs
// description: error types for scene building and render execution
// reference: https://docs.rs/thiserror

use super::traits::StageRef;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a renderer while building or executing a scene.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer refused a request (bad value, wrong stage kind).
    #[error("Renderer rejected request: {0}")]
    Rejected(String),

    /// A stage handle that this renderer never issued.
    #[error("Unknown stage {0}")]
    UnknownStage(StageRef),

    /// The scene script could not be written.
    #[error("Failed to write render script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The render executable could not be started.
    #[error("Failed to start {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The render process exited unsuccessfully.
    #[error("Render process exited with {}: {stderr}", describe_exit(.exit_code))]
    ProcessFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("code {}", code),
        None => "signal".to_string(),
    }
}
