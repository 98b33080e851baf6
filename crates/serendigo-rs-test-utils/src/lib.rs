//! Test helpers shared across Serendigo crates.

pub mod directory;
pub mod narration;
pub mod places;
pub mod store;

pub use directory::StubDirectory;
pub use narration::{FailingNarrator, FixedNarrator};
pub use places::{FailingProvider, SlowProvider, StubProvider, candidate_north_of};
pub use store::{FailingStore, InMemoryStore};
