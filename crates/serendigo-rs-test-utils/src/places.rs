use async_trait::async_trait;
use parking_lot::Mutex;
use serendigo_rs_protocol::SuggestionSource;
use serendigo_rs_providers::{LookupRequest, PlaceCandidate, PlaceProvider, ProviderError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Kilometers per degree of latitude on the mean-radius sphere.
const KM_PER_DEGREE: f64 = 6371.0088 * std::f64::consts::PI / 180.0;

/// Candidate placed `km` due north of the origin.
pub fn candidate_north_of(name: &str, lat: f64, lng: f64, km: f64) -> PlaceCandidate {
    PlaceCandidate::new(name, lat + km / KM_PER_DEGREE, lng)
}

/// Returns a fixed candidate list and records every request.
#[derive(Clone)]
pub struct StubProvider {
    source: SuggestionSource,
    candidates: Vec<PlaceCandidate>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<LookupRequest>>>,
}

impl StubProvider {
    pub fn new(source: SuggestionSource, candidates: Vec<PlaceCandidate>) -> Self {
        Self {
            source,
            candidates,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn empty(source: SuggestionSource) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<LookupRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PlaceProvider for StubProvider {
    fn source(&self) -> SuggestionSource {
        self.source
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<Vec<PlaceCandidate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        Ok(self.candidates.clone())
    }
}

/// Always fails as an unreachable upstream would.
#[derive(Clone)]
pub struct FailingProvider {
    source: SuggestionSource,
    calls: Arc<AtomicUsize>,
}

impl FailingProvider {
    pub fn new(source: SuggestionSource) -> Self {
        Self {
            source,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaceProvider for FailingProvider {
    fn source(&self) -> SuggestionSource {
        self.source
    }

    async fn lookup(&self, _request: &LookupRequest) -> Result<Vec<PlaceCandidate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Unavailable(format!("{} is down", self.source)))
    }
}

/// Sleeps before answering; used to exercise per-provider timeouts.
#[derive(Clone)]
pub struct SlowProvider {
    source: SuggestionSource,
    delay: Duration,
    candidates: Vec<PlaceCandidate>,
}

impl SlowProvider {
    pub fn new(source: SuggestionSource, delay: Duration, candidates: Vec<PlaceCandidate>) -> Self {
        Self {
            source,
            delay,
            candidates,
        }
    }
}

#[async_trait]
impl PlaceProvider for SlowProvider {
    fn source(&self) -> SuggestionSource {
        self.source
    }

    async fn lookup(&self, _request: &LookupRequest) -> Result<Vec<PlaceCandidate>, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.candidates.clone())
    }
}
