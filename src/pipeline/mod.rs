// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod state;
pub mod version;

pub use orchestrator::{PipelineOrchestrator, ReviewOutcome};
pub use state::PipelineState;
