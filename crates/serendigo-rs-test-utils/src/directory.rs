use crate::places::FailingProvider;
use async_trait::async_trait;
use parking_lot::Mutex;
use serendigo_rs_protocol::{PlaceDetails, PlacePrediction};
use serendigo_rs_providers::{PlaceDirectory, PlacePhoto, ProviderError};
use std::sync::Arc;

/// Serves fixed predictions, details, and a single photo; records inputs.
#[derive(Clone, Default)]
pub struct StubDirectory {
    predictions: Vec<PlacePrediction>,
    details: Vec<PlaceDetails>,
    photo: Option<PlacePhoto>,
    inputs: Arc<Mutex<Vec<(String, usize)>>>,
}

impl StubDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prediction(mut self, description: &str, place_id: &str) -> Self {
        self.predictions.push(PlacePrediction {
            description: description.to_string(),
            place_id: place_id.to_string(),
        });
        self
    }

    pub fn with_details(mut self, details: PlaceDetails) -> Self {
        self.details.push(details);
        self
    }

    pub fn with_photo(mut self, content_type: &str, bytes: Vec<u8>) -> Self {
        self.photo = Some(PlacePhoto {
            content_type: content_type.to_string(),
            bytes,
        });
        self
    }

    /// `(input, limit)` of every predictions call.
    pub fn inputs(&self) -> Vec<(String, usize)> {
        self.inputs.lock().clone()
    }
}

#[async_trait]
impl PlaceDirectory for StubDirectory {
    async fn predictions(
        &self,
        input: &str,
        limit: usize,
    ) -> Result<Vec<PlacePrediction>, ProviderError> {
        self.inputs.lock().push((input.to_string(), limit));
        Ok(self.predictions.iter().take(limit).cloned().collect())
    }

    async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ProviderError> {
        Ok(self
            .details
            .iter()
            .find(|details| details.place_id == place_id)
            .cloned())
    }

    async fn photo(&self, _reference: &str, _max_width: u32) -> Result<PlacePhoto, ProviderError> {
        self.photo
            .clone()
            .ok_or_else(|| ProviderError::Status {
                status: 404,
                body: "no photo".to_string(),
            })
    }
}

#[async_trait]
impl PlaceDirectory for FailingProvider {
    async fn predictions(
        &self,
        _input: &str,
        _limit: usize,
    ) -> Result<Vec<PlacePrediction>, ProviderError> {
        Err(ProviderError::Unavailable("place lookup is down".to_string()))
    }

    async fn details(&self, _place_id: &str) -> Result<Option<PlaceDetails>, ProviderError> {
        Err(ProviderError::Unavailable("place lookup is down".to_string()))
    }

    async fn photo(&self, _reference: &str, _max_width: u32) -> Result<PlacePhoto, ProviderError> {
        Err(ProviderError::Unavailable("place lookup is down".to_string()))
    }
}
