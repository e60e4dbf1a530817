// file: src/pipeline/version.rs
// description: builds the review Version record written to the tracking system
// reference: ShotGrid Version entity fields

use crate::error::Result;
use crate::models::{EntityLink, PublishRecord, RenderJob};
use crate::tracking::Record;
use serde_json::{Value, json};

pub const VERSION: &str = "Version";
pub const TASK: &str = "Task";

fn optional_link(link: &Option<EntityLink>) -> Value {
    link.as_ref().map(EntityLink::reference).unwrap_or(Value::Null)
}

/// Field set for a new review Version. Frame numbers come from the job, not
/// from the scanned sequence.
pub fn version_fields(publish: &PublishRecord, job: &RenderJob, status: &str) -> Result<Record> {
    let range = job.frame_range;

    let fields = [
        ("project", publish.project()?.reference()),
        ("code", json!(publish.code())),
        ("description", json!(publish.description())),
        ("sg_colorspace", json!(job.colorspace_odt)),
        ("sg_path_to_movie", json!(job.slate_path.display().to_string())),
        ("sg_path_to_frames", json!(job.sequence_path.display().to_string())),
        ("sg_status_list", json!(status)),
        ("sg_first_frame", json!(range.first)),
        ("sg_last_frame", json!(range.last)),
        ("sg_uploaded_movie_frame_rate", json!(job.fps)),
        ("frame_range", json!(range.tracking_label())),
        ("sg_movie_has_slate", Value::Bool(true)),
        ("entity", optional_link(&publish.entity)),
        ("sg_task", optional_link(&publish.task)),
        ("user", optional_link(&publish.created_by)),
        ("published_files", json!([publish.link().reference()])),
    ];

    Ok(fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect())
}

pub fn task_status_fields(status: &str) -> Record {
    let mut record = Record::new();
    record.insert("sg_status_list".to_string(), Value::from(status));
    record
}
