// file: src/tracking/lookup.rs
// description: fetches the publish record a review is built for
// reference: PublishedFile lookup by id

use crate::error::{PipelineError, Result};
use crate::models::{PUBLISH_FIELDS, PUBLISHED_FILE, PublishRecord};
use crate::tracking::traits::{Filter, TrackingClient};
use tracing::info;

pub struct PublishLookup<'a, T: TrackingClient + ?Sized> {
    client: &'a T,
}

impl<'a, T: TrackingClient + ?Sized> PublishLookup<'a, T> {
    pub fn new(client: &'a T) -> Self {
        Self { client }
    }

    pub fn fetch(&self, publish_id: u64) -> Result<PublishRecord> {
        let filters = [Filter::is("id", publish_id)];

        let record = self
            .client
            .find_one(PUBLISHED_FILE, &filters, &PUBLISH_FIELDS)
            .map_err(|e| PipelineError::PublishLookup {
                publish_id,
                reason: e.to_string(),
            })?
            .ok_or_else(|| PipelineError::PublishLookup {
                publish_id,
                reason: "no publish with this id".to_string(),
            })?;

        let publish = PublishRecord::from_record(publish_id, record)?;
        info!("Got publish data for {} ({})", publish_id, publish.code());
        Ok(publish)
    }
}
