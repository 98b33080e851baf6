//! Audio guide request and response types.

use serde::{Deserialize, Serialize};

/// Narration tone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideStyle {
    #[default]
    Friendly,
    Energetic,
    Calm,
}

/// Optional listener profile used to tailor the narration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audience {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Body of a guide generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideRequest {
    #[serde(default)]
    pub style: GuideStyle,
    #[serde(default)]
    pub audience: Option<Audience>,
    /// Voice override for speech synthesis.
    #[serde(default)]
    pub voice: Option<String>,
}

/// Where the generated guide ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuideMedia {
    /// Speech synthesis succeeded and an audio file was stored.
    Synthesized { audio_url: String },
    /// Speech synthesis failed and the narrative text was stored instead.
    Fallback { text_url: String },
}

impl GuideMedia {
    pub fn url(&self) -> &str {
        match self {
            GuideMedia::Synthesized { audio_url } => audio_url,
            GuideMedia::Fallback { text_url } => text_url,
        }
    }
}

/// Result of a guide generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideResponse {
    pub destination_id: String,
    pub text: String,
    pub media: GuideMedia,
}
