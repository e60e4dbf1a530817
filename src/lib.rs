// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod sequence;
pub mod tracking;
pub mod utils;

pub use config::{Config, RenderFailurePolicy, RendererConfig, ReviewConfig, TrackingConfig};
pub use error::{PipelineError, Result};
pub use models::{FrameRange, FrameSequence, PublishRecord, RenderJob, SlateFields};
pub use pipeline::{PipelineOrchestrator, PipelineState, ReviewOutcome};
pub use render::{NukeScriptRenderer, RenderError, Renderer};
pub use sequence::{SequenceScanner, SequenceValidator};
pub use tracking::{PublishLookup, ShotgridClient, ShotgridCredentials, TrackingClient};
pub use utils::Validator;
