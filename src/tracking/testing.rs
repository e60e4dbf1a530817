// file: src/tracking/testing.rs
// description: recording tracking client double with per-call failure injection
// reference: test support

use super::error::TrackingError;
use super::traits::{Filter, Record, TrackingClient, record_id};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub entity_type: String,
    pub id: u64,
    pub path: PathBuf,
    pub field_name: String,
}

/// In-memory tracker. Every call is appended to `calls` as
/// `"<op> <entity_type> [id]"` before any injected failure is returned.
#[derive(Debug)]
pub struct RecordingTracker {
    publish: Option<Record>,
    calls: RefCell<Vec<String>>,
    failing: RefCell<HashSet<String>>,
    next_id: Cell<u64>,
    pub created: RefCell<Vec<(String, Record)>>,
    pub uploads: RefCell<Vec<Upload>>,
    pub updates: RefCell<Vec<(String, u64, Record)>>,
}

impl Default for RecordingTracker {
    fn default() -> Self {
        Self {
            publish: None,
            calls: RefCell::new(Vec::new()),
            failing: RefCell::new(HashSet::new()),
            next_id: Cell::new(9000),
            created: RefCell::new(Vec::new()),
            uploads: RefCell::new(Vec::new()),
            updates: RefCell::new(Vec::new()),
        }
    }
}

impl RecordingTracker {
    pub fn with_publish(publish: Value) -> Self {
        let Value::Object(record) = publish else {
            panic!("publish fixture must be an object");
        };
        Self {
            publish: Some(record),
            ..Self::default()
        }
    }

    pub fn fail_on(&self, operation: &str) {
        self.failing.borrow_mut().insert(operation.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    fn record(&self, operation: &str, detail: String) -> Result<(), TrackingError> {
        self.calls
            .borrow_mut()
            .push(format!("{} {}", operation, detail));
        if self.failing.borrow().contains(operation) {
            return Err(TrackingError::Other(format!("injected {} failure", operation)));
        }
        Ok(())
    }
}

impl TrackingClient for RecordingTracker {
    fn find_one(
        &self,
        entity_type: &str,
        filters: &[Filter],
        _fields: &[&str],
    ) -> Result<Option<Record>, TrackingError> {
        self.record("find_one", entity_type.to_string())?;

        let wanted = filters
            .iter()
            .find(|f| f.0 == "id")
            .and_then(|f| f.2.as_u64());
        let publish = self
            .publish
            .as_ref()
            .filter(|p| wanted.is_none() || p.get("id").and_then(Value::as_u64) == wanted);
        Ok(publish.cloned())
    }

    fn create(&self, entity_type: &str, mut fields: Record) -> Result<Record, TrackingError> {
        self.record("create", entity_type.to_string())?;

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        fields.insert("id".to_string(), Value::from(id));
        fields.insert("type".to_string(), Value::from(entity_type));
        self.created
            .borrow_mut()
            .push((entity_type.to_string(), fields.clone()));
        record_id(&fields)?;
        Ok(fields)
    }

    fn upload(
        &self,
        entity_type: &str,
        id: u64,
        path: &Path,
        field_name: &str,
    ) -> Result<(), TrackingError> {
        self.record("upload", format!("{} {}", entity_type, id))?;
        self.uploads.borrow_mut().push(Upload {
            entity_type: entity_type.to_string(),
            id,
            path: path.to_path_buf(),
            field_name: field_name.to_string(),
        });
        Ok(())
    }

    fn update(&self, entity_type: &str, id: u64, fields: Record) -> Result<(), TrackingError> {
        self.record("update", format!("{} {}", entity_type, id))?;
        self.updates
            .borrow_mut()
            .push((entity_type.to_string(), id, fields));
        Ok(())
    }
}
