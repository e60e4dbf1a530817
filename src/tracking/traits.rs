// file: src/tracking/traits.rs
// description: production tracking capability consumed by the review pipeline
// reference: ShotGrid find_one/create/upload/update call shapes

use super::error::TrackingError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

/// A flat tracking record: field name to JSON value, links as
/// `{"type", "id", "name"}` objects.
pub type Record = Map<String, Value>;

/// Query filter serialized as `[field, relation, value]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter(pub String, pub String, pub Value);

impl Filter {
    pub fn is(field: &str, value: impl Into<Value>) -> Self {
        Filter(field.to_string(), "is".to_string(), value.into())
    }
}

/// Narrow view of the production tracking system.
///
/// Calls are blocking and independent; nothing here is transactional.
pub trait TrackingClient {
    fn find_one(
        &self,
        entity_type: &str,
        filters: &[Filter],
        fields: &[&str],
    ) -> Result<Option<Record>, TrackingError>;

    /// Creates an entity and returns it, including its new `id`.
    fn create(&self, entity_type: &str, fields: Record) -> Result<Record, TrackingError>;

    /// Attaches the file at `path` to `field_name` of an existing entity.
    fn upload(
        &self,
        entity_type: &str,
        id: u64,
        path: &Path,
        field_name: &str,
    ) -> Result<(), TrackingError>;

    fn update(&self, entity_type: &str, id: u64, fields: Record) -> Result<(), TrackingError>;
}

/// Reads the numeric `id` of a created record.
pub fn record_id(record: &Record) -> Result<u64, TrackingError> {
    record
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| TrackingError::MissingField("id".to_string()))
}
