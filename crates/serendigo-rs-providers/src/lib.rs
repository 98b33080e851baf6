//! Adapters for the external place, food, and event sources, the destination
//! lookup, and the text-generation and speech-synthesis clients used for
//! audio guides.

mod candidate;
pub mod directory;
mod error;
pub mod events;
pub mod google;
pub mod hotpepper;
mod http;
mod json;
pub mod narration;
pub mod openai;

pub use candidate::{LookupRequest, PlaceCandidate, PlaceProvider};
pub use directory::{PHOTO_ROUTE, PlaceDirectory, PlacePhoto};
pub use error::{NarrationError, ProviderError};
pub use events::{ConnpassEvents, NominatimGeocoder, ReverseGeocoder};
pub use google::GooglePlaces;
pub use hotpepper::HotPepper;
pub use narration::{SpeechSynthesizer, TextGenerator};
pub use openai::OpenAiNarrator;
