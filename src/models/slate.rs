// file: src/models/slate.rs
// description: flat slate field set derived from publish data and the render job
// reference: slate gizmo knob layout

use crate::error::Result;
use crate::models::{PublishRecord, RenderJob};
use chrono::{DateTime, TimeZone};
use serde::Serialize;

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Values shown on the slate frame, copied verbatim from their sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlateFields {
    pub project: String,
    pub company: String,
    pub file: String,
    pub frame_list: String,
    pub date: String,
    pub artist: String,
    pub task: String,
    pub version: String,
    pub fps: f64,
    pub colorspace_idt: String,
    pub colorspace_odt: String,
    pub description: String,
}

impl SlateFields {
    /// Fails with a slate field error when a required publish link is absent.
    pub fn from_publish<Tz>(
        publish: &PublishRecord,
        job: &RenderJob,
        now: &DateTime<Tz>,
        date_format: &str,
    ) -> Result<Self>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Ok(Self {
            project: publish.project_name()?.to_string(),
            company: job.company.clone(),
            file: publish.code().to_string(),
            frame_list: job.frame_range.slate_label(),
            date: now.format(date_format).to_string(),
            artist: publish.artist_name()?.to_string(),
            task: publish.task_name()?.to_string(),
            version: publish.version_label()?,
            fps: job.fps,
            colorspace_idt: job.colorspace_idt.clone(),
            colorspace_odt: job.colorspace_odt.clone(),
            description: publish.description().to_string(),
        })
    }

    /// Knob name and text value pairs, in slate order. `fps` is numeric and
    /// exposed separately.
    pub fn text_knobs(&self) -> [(&'static str, &str); 11] {
        [
            ("project", self.project.as_str()),
            ("company", self.company.as_str()),
            ("file", self.file.as_str()),
            ("frameList", self.frame_list.as_str()),
            ("date", self.date.as_str()),
            ("artist", self.artist.as_str()),
            ("task", self.task.as_str()),
            ("version", self.version.as_str()),
            ("colorspaceIDT", self.colorspace_idt.as_str()),
            ("colorspaceODT", self.colorspace_odt.as_str()),
            ("description", self.description.as_str()),
        ]
    }
}
