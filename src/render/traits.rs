// file: src/render/traits.rs
// description: renderer capability consumed by the review pipeline
// reference: narrow scene-graph interface over the compositing engine

use std::fmt;
use std::path::Path;

use super::error::RenderError;
use crate::models::{FrameRange, SlateFields};

/// Opaque handle to a stage (node) created by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageRef(pub usize);

impl fmt::Display for StageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A compositing engine that can read a sequence, put a slate in front of it
/// and write the result.
///
/// Stages form a chain: every stage after the input consumes exactly one
/// upstream stage.
pub trait Renderer {
    /// Returns the name of this renderer implementation.
    fn name(&self) -> &str;

    /// Sets scene-wide playback range, frame rate and colour management mode.
    fn configure_scene(
        &mut self,
        fps: f64,
        frame_range: FrameRange,
        color_management: &str,
    ) -> Result<(), RenderError>;

    /// Reads the frame sequence at `path` over `frame_range`.
    fn create_input_stage(
        &mut self,
        path: &Path,
        frame_range: FrameRange,
        colorspace: &str,
    ) -> Result<StageRef, RenderError>;

    /// Prepends a slate frame populated from `fields`.
    fn create_slate_stage(
        &mut self,
        input: StageRef,
        fields: &SlateFields,
    ) -> Result<StageRef, RenderError>;

    /// Writes `input` to `path` in `colorspace`.
    fn create_output_stage(
        &mut self,
        input: StageRef,
        path: &Path,
        colorspace: &str,
    ) -> Result<StageRef, RenderError>;

    /// Renders `stage` over `[start, end]`, blocking until done.
    fn execute(&mut self, stage: StageRef, start: i64, end: i64) -> Result<(), RenderError>;
}
