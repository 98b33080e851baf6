//! Interfaces for the guide pipeline's external services.

use crate::error::NarrationError;
use async_trait::async_trait;

/// Produces narrative text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, NarrationError>;
}

/// Turns text into encoded audio (MP3).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// `voice` overrides the configured default when set.
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, NarrationError>;
}
