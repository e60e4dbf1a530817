// file: src/models/render_job.rs
// description: validated render job built from launcher arguments
// reference: internal data structures

use crate::error::{PipelineError, Result};
use crate::models::FrameRange;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderJob {
    pub sequence_path: PathBuf,
    pub slate_path: PathBuf,
    pub frame_range: FrameRange,
    pub fps: f64,
    pub colorspace_idt: String,
    pub colorspace_odt: String,
    pub company: String,
}

#[derive(Debug, Clone)]
pub struct RenderJobBuilder {
    sequence_path: PathBuf,
    slate_path: PathBuf,
    first_frame: i64,
    last_frame: i64,
    fps: f64,
    colorspace_idt: String,
    colorspace_odt: String,
    company: String,
}

impl RenderJob {
    pub fn builder(sequence_path: impl Into<PathBuf>, slate_path: impl Into<PathBuf>) -> RenderJobBuilder {
        RenderJobBuilder {
            sequence_path: sequence_path.into(),
            slate_path: slate_path.into(),
            first_frame: 1001,
            last_frame: 1001,
            fps: 25.0,
            colorspace_idt: "ACES - ACEScg".to_string(),
            colorspace_odt: "Output - sRGB".to_string(),
            company: "ShotGrid".to_string(),
        }
    }

    pub fn first_frame(&self) -> i64 {
        self.frame_range.first
    }

    pub fn last_frame(&self) -> i64 {
        self.frame_range.last
    }
}

impl RenderJobBuilder {
    pub fn frames(mut self, first: i64, last: i64) -> Self {
        self.first_frame = first;
        self.last_frame = last;
        self
    }

    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn colorspaces(mut self, idt: impl Into<String>, odt: impl Into<String>) -> Self {
        self.colorspace_idt = idt.into();
        self.colorspace_odt = odt.into();
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn build(self) -> Result<RenderJob> {
        let frame_range = FrameRange::new(self.first_frame, self.last_frame).ok_or_else(|| {
            PipelineError::Usage(format!(
                "first frame {} is after last frame {}",
                self.first_frame, self.last_frame
            ))
        })?;

        // The slate frame sits one before `first`, and labels show `last - first`.
        if self.first_frame.checked_sub(1).is_none()
            || self.last_frame.checked_sub(self.first_frame).is_none()
        {
            return Err(PipelineError::Usage(format!(
                "frame range {}-{} is out of bounds",
                self.first_frame, self.last_frame
            )));
        }

        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(PipelineError::Usage(format!(
                "fps must be greater than 0, got {}",
                self.fps
            )));
        }

        if self.sequence_path.as_os_str().is_empty() || self.slate_path.as_os_str().is_empty() {
            return Err(PipelineError::Usage(
                "sequence path and slate path are required".to_string(),
            ));
        }

        Ok(RenderJob {
            sequence_path: self.sequence_path,
            slate_path: self.slate_path,
            frame_range,
            fps: self.fps,
            colorspace_idt: self.colorspace_idt,
            colorspace_odt: self.colorspace_odt,
            company: self.company,
        })
    }
}
