//! Error types for the core service crate.

use serendigo_rs_protocol::ValidationError;
use serendigo_rs_providers::{NarrationError, ProviderError};
use serendigo_rs_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by search, history, and guide operations.
#[derive(Debug, Error)]
pub enum SerendigoCoreError {
    /// Malformed request input.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    /// Record store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// Text generation failed; no guide could be produced.
    #[error("narration error: {0}")]
    Narration(#[from] NarrationError),
    /// A guide file could not be written, not even the text fallback.
    #[error("media error at {path}: {source}")]
    Media {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Provider client construction failed.
    #[error("provider setup error: {0}")]
    Provider(#[from] ProviderError),
    /// Settings that passed schema checks but cannot be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}
