//! OpenAI chat-completion and speech clients.

use crate::error::NarrationError;
use crate::http::truncate;
use crate::json::non_empty;
use crate::narration::{SpeechSynthesizer, TextGenerator};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serendigo_rs_config::GuideConfig;
use std::time::Duration;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'static str,
}

/// Client for both narration services.
#[derive(Clone)]
pub struct OpenAiNarrator {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    text_model: String,
    speech_model: String,
    voice: String,
    temperature: f32,
}

impl OpenAiNarrator {
    pub fn from_config(config: &GuideConfig) -> Result<Self, NarrationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let api_key = non_empty(config.api_key.clone());
        if api_key.is_none() {
            info!("guide narration disabled (reason=missing api key)");
        }
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            speech_model: config.speech_model.clone(),
            voice: config.voice.clone(),
            temperature: config.temperature,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, NarrationError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| NarrationError::Unavailable("OPENAI_API_KEY is not set".to_string()))
    }
}

async fn ensure_success(response: Response) -> Result<Response, NarrationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(NarrationError::Status {
        status: status.as_u16(),
        body: truncate(body),
    })
}

/// Pull the first non-empty message out of a chat-completion payload.
fn first_choice_text(response: ChatResponse) -> Result<String, NarrationError> {
    response
        .choices
        .into_iter()
        .find_map(|choice| non_empty(choice.message.content))
        .map(|text| text.trim().to_string())
        .ok_or(NarrationError::EmptyResponse("chat completion"))
}

#[async_trait]
impl TextGenerator for OpenAiNarrator {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, NarrationError> {
        let api_key = self.api_key()?;
        let request = ChatRequest {
            model: &self.text_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|err| NarrationError::Decode(err.to_string()))?;
        let text = first_choice_text(parsed)?;
        debug!(
            "guide text generated (model={}, chars={})",
            self.text_model,
            text.chars().count()
        );
        Ok(text)
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiNarrator {
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, NarrationError> {
        let api_key = self.api_key()?;
        let request = SpeechRequest {
            model: &self.speech_model,
            voice: voice.unwrap_or(&self.voice),
            input: text,
            response_format: "mp3",
        };
        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let audio = ensure_success(response).await?.bytes().await?;
        if audio.is_empty() {
            return Err(NarrationError::EmptyResponse("speech synthesis"));
        }
        debug!(
            "guide audio synthesized (model={}, bytes={})",
            self.speech_model,
            audio.len()
        );
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_first_non_empty_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{ "choices": [
                { "message": { "role": "assistant", "content": "  " } },
                { "message": { "role": "assistant", "content": "\n概要: 東京駅は…\n" } }
            ] }"#,
        )
        .expect("json");
        assert_eq!(first_choice_text(response).expect("text"), "概要: 東京駅は…");
    }

    #[test]
    fn empty_choices_is_empty_response() {
        let response: ChatResponse = serde_json::from_str(r#"{ "choices": [] }"#).expect("json");
        assert!(matches!(
            first_choice_text(response),
            Err(NarrationError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn missing_key_is_unavailable() {
        let narrator = OpenAiNarrator::from_config(&GuideConfig::default()).expect("narrator");
        assert!(!narrator.is_enabled());
        let err = narrator.generate("system", "prompt").await.unwrap_err();
        assert!(matches!(err, NarrationError::Unavailable(_)));
        let err = narrator.synthesize("text", None).await.unwrap_err();
        assert!(matches!(err, NarrationError::Unavailable(_)));
    }
}
