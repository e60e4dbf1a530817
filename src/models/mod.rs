// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod frame_sequence;
pub mod publish;
pub mod render_job;
pub mod slate;

pub use frame_sequence::{FrameRange, FrameSequence, SequenceTemplate};
pub use publish::{EntityLink, PUBLISH_FIELDS, PUBLISHED_FILE, PublishRecord};
pub use render_job::{RenderJob, RenderJobBuilder};
pub use slate::SlateFields;
