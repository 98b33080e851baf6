//! Error types for provider and narration calls.

use std::time::Duration;

/// A single external data source failed.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure (connect, TLS, client timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success HTTP status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// The call exceeded its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// The upstream refused the request (quota, bad key, service error).
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Text-generation or speech-synthesis failure.
#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    /// No credentials are configured.
    #[error("narration service unavailable: {0}")]
    Unavailable(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
    /// The service answered but produced nothing usable.
    #[error("empty response from {0}")]
    EmptyResponse(&'static str),
}
