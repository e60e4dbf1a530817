// file: src/render/testing.rs
// description: recording renderer double with per-call failure injection
// reference: test support

use super::error::RenderError;
use super::traits::{Renderer, StageRef};
use crate::models::{FrameRange, SlateFields};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<String>,
    failing: HashSet<String>,
    stages: usize,
    pub scene_range: Option<FrameRange>,
    pub input: Option<(PathBuf, FrameRange, String)>,
    pub slate: Option<SlateFields>,
    pub output: Option<(PathBuf, String)>,
    pub executed: Option<(StageRef, i64, i64)>,
}

impl RecordingRenderer {
    pub fn failing_on(operation: &str) -> Self {
        let mut renderer = Self::default();
        renderer.failing.insert(operation.to_string());
        renderer
    }

    fn record(&mut self, operation: &str) -> Result<(), RenderError> {
        self.calls.push(operation.to_string());
        if self.failing.contains(operation) {
            return Err(RenderError::Rejected(format!("injected {} failure", operation)));
        }
        Ok(())
    }

    fn next_stage(&mut self) -> StageRef {
        self.stages += 1;
        StageRef(self.stages - 1)
    }
}

impl Renderer for RecordingRenderer {
    fn name(&self) -> &str {
        "recording"
    }

    fn configure_scene(
        &mut self,
        _fps: f64,
        frame_range: FrameRange,
        _color_management: &str,
    ) -> Result<(), RenderError> {
        self.record("configure_scene")?;
        self.scene_range = Some(frame_range);
        Ok(())
    }

    fn create_input_stage(
        &mut self,
        path: &Path,
        frame_range: FrameRange,
        colorspace: &str,
    ) -> Result<StageRef, RenderError> {
        self.record("create_input_stage")?;
        self.input = Some((path.to_path_buf(), frame_range, colorspace.to_string()));
        Ok(self.next_stage())
    }

    fn create_slate_stage(
        &mut self,
        _input: StageRef,
        fields: &SlateFields,
    ) -> Result<StageRef, RenderError> {
        self.record("create_slate_stage")?;
        self.slate = Some(fields.clone());
        Ok(self.next_stage())
    }

    fn create_output_stage(
        &mut self,
        _input: StageRef,
        path: &Path,
        colorspace: &str,
    ) -> Result<StageRef, RenderError> {
        self.record("create_output_stage")?;
        self.output = Some((path.to_path_buf(), colorspace.to_string()));
        Ok(self.next_stage())
    }

    fn execute(&mut self, stage: StageRef, start: i64, end: i64) -> Result<(), RenderError> {
        self.executed = Some((stage, start, end));
        self.record("execute")
    }
}
