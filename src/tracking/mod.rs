// file: src/tracking/mod.rs
// description: production tracking module exports
// reference: internal module structure

pub mod error;
pub mod lookup;
pub mod shotgrid;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use error::TrackingError;
pub use lookup::PublishLookup;
pub use shotgrid::{ShotgridClient, ShotgridCredentials};
pub use traits::{Filter, Record, TrackingClient, record_id};
