use async_trait::async_trait;
use parking_lot::Mutex;
use serendigo_rs_providers::{NarrationError, SpeechSynthesizer, TextGenerator};
use std::sync::Arc;

/// Returns fixed text and audio, recording the prompts it was given.
#[derive(Clone)]
pub struct FixedNarrator {
    text: String,
    audio: Vec<u8>,
    prompts: Arc<Mutex<Vec<String>>>,
    voices: Arc<Mutex<Vec<Option<String>>>>,
}

impl FixedNarrator {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            audio: b"ID3fake-mp3".to_vec(),
            prompts: Arc::new(Mutex::new(Vec::new())),
            voices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_audio(mut self, audio: Vec<u8>) -> Self {
        self.audio = audio;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn voices(&self) -> Vec<Option<String>> {
        self.voices.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for FixedNarrator {
    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, NarrationError> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.text.clone())
    }
}

#[async_trait]
impl SpeechSynthesizer for FixedNarrator {
    async fn synthesize(&self, _text: &str, voice: Option<&str>) -> Result<Vec<u8>, NarrationError> {
        self.voices.lock().push(voice.map(str::to_string));
        Ok(self.audio.clone())
    }
}

/// Fails every call; `unavailable()` mimics a missing API key.
#[derive(Clone)]
pub struct FailingNarrator {
    unavailable: bool,
}

impl FailingNarrator {
    pub fn new() -> Self {
        Self { unavailable: false }
    }

    pub fn unavailable() -> Self {
        Self { unavailable: true }
    }

    fn error(&self) -> NarrationError {
        if self.unavailable {
            NarrationError::Unavailable("no api key".to_string())
        } else {
            NarrationError::Status {
                status: 500,
                body: "upstream exploded".to_string(),
            }
        }
    }
}

impl Default for FailingNarrator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for FailingNarrator {
    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, NarrationError> {
        Err(self.error())
    }
}

#[async_trait]
impl SpeechSynthesizer for FailingNarrator {
    async fn synthesize(&self, _text: &str, _voice: Option<&str>) -> Result<Vec<u8>, NarrationError> {
        Err(self.error())
    }
}
