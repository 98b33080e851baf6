//! Detour search, history, and guide services for Serendigo.
//!
//! This crate owns the geo helpers, the chain-brand filter, the search and
//! ranking engine, and the narrated-guide pipeline used by the server.

pub mod chain;
pub mod context;
pub mod engine;
pub mod error;
pub mod geo;
pub mod guide;
pub mod local;
pub mod media;

pub use chain::{ChainFilter, DEFAULT_CHAIN_BRANDS};
pub use context::ServiceContext;
pub use engine::{DetourEngine, MAX_SUGGESTIONS, ProviderSet, RADIUS_SLACK, SearchRadius};
pub use error::SerendigoCoreError;
pub use guide::{GuideService, compose_prompt};
pub use media::{MediaStore, StoredMedia};
