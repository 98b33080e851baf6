//! Configuration models and layered config loading.
//!
//! This crate owns the Serendigo config schema, validation, layer merging, and
//! environment overrides used by the server binary and the SDK.

mod env;
mod error;
mod loader;
mod model;

/// Environment variables that override file layers.
pub use env::ENV_KEYS;
/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
