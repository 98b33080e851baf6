//! Public SDK surface for Serendigo.
//!
//! This crate re-exports the building blocks behind the `serendigo` binary
//! and provides a small logging helper so embedders start up the same way.

/// Re-export for convenience.
pub use serendigo_rs_config as config;
pub use serendigo_rs_core as core;
/// Re-export for convenience.
pub use serendigo_rs_protocol as protocol;
pub use serendigo_rs_providers as providers;
/// Re-export for convenience.
pub use serendigo_rs_server as server;
pub use serendigo_rs_store as store;

#[inline]
/// Initialize logging with env_logger (`RUST_LOG`), millisecond timestamps.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
