//! Saved destinations that guides are generated for.

use crate::{ValidationError, query::validate_coordinates};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Destinations returned per page when no limit is given.
pub const DEFAULT_DESTINATION_LIMIT: usize = 20;
/// Largest destination page.
pub const MAX_DESTINATION_LIMIT: usize = 100;

/// Input for registering a destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDestination {
    /// External place identifier; unique across destinations.
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl NewDestination {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.place_id.trim().is_empty() {
            return Err(ValidationError::MissingField("place_id"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        validate_coordinates(self.lat, self.lng)
    }
}

/// A persisted destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    pub id: String,
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
}
