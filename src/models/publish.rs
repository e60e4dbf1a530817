// file: src/models/publish.rs
// description: publish record snapshot fetched from the tracking system
// reference: ShotGrid PublishedFile entity fields

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PUBLISHED_FILE: &str = "PublishedFile";

/// Fields requested when looking a publish up.
pub const PUBLISH_FIELDS: [&str; 7] = [
    "created_by",
    "code",
    "task",
    "project",
    "entity",
    "description",
    "version_number",
];

/// Link to another tracking entity, as the tracking API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityLink {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityLink {
    pub fn new(entity_type: &str, id: u64) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            id,
            name: None,
        }
    }

    pub fn named(entity_type: &str, id: u64, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new(entity_type, id)
        }
    }

    /// `{type, id}` only, the form the API accepts on writes.
    pub fn reference(&self) -> Value {
        serde_json::json!({"type": self.entity_type, "id": self.id})
    }
}

/// Immutable snapshot of a PublishedFile. Links are optional here and only
/// enforced by the stages that need them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRecord {
    pub id: u64,
    #[serde(default)]
    pub project: Option<EntityLink>,
    #[serde(default)]
    pub task: Option<EntityLink>,
    #[serde(default)]
    pub entity: Option<EntityLink>,
    #[serde(default)]
    pub created_by: Option<EntityLink>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version_number: Option<u32>,
}

impl PublishRecord {
    pub fn from_record(publish_id: u64, record: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(record)).map_err(|e| PipelineError::PublishLookup {
            publish_id,
            reason: format!("unexpected record shape: {}", e),
        })
    }

    pub fn project_name(&self) -> Result<&str> {
        link_name(&self.project, "project.name")
    }

    pub fn task_name(&self) -> Result<&str> {
        link_name(&self.task, "task.name")
    }

    pub fn artist_name(&self) -> Result<&str> {
        link_name(&self.created_by, "created_by.name")
    }

    pub fn project(&self) -> Result<&EntityLink> {
        self.project
            .as_ref()
            .ok_or(PipelineError::SlateField("project"))
    }

    pub fn task(&self) -> Result<&EntityLink> {
        self.task.as_ref().ok_or(PipelineError::SlateField("task"))
    }

    pub fn version_number(&self) -> Result<u32> {
        self.version_number
            .ok_or(PipelineError::SlateField("version_number"))
    }

    /// `v%03d` formatted version label.
    pub fn version_label(&self) -> Result<String> {
        Ok(format!("v{:03}", self.version_number()?))
    }

    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn link(&self) -> EntityLink {
        EntityLink::new(PUBLISHED_FILE, self.id)
    }
}

fn link_name<'a>(link: &'a Option<EntityLink>, field: &'static str) -> Result<&'a str> {
    link.as_ref()
        .and_then(|l| l.name.as_deref())
        .ok_or(PipelineError::SlateField(field))
}
