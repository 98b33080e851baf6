//! Narrated destination guides: text generation, then speech synthesis with
//! a stored-text fallback.

use crate::error::SerendigoCoreError;
use crate::media::{MediaStore, StoredMedia};
use log::{info, warn};
use serendigo_rs_protocol::{
    Audience, Destination, GuideMedia, GuideRequest, GuideResponse, GuideStyle,
};
use serendigo_rs_providers::{SpeechSynthesizer, TextGenerator};
use serendigo_rs_store::DestinationStore;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "あなたは旅行者に寄り添う経験豊かな観光ガイドです。\
次のルールを守ってください。\
1) 400〜600字の読み上げ用台本にする。\
2) 『概要』『見どころ』『歴史・豆知識』『おすすめ』『アクセス・注意点』の見出しを入れる。\
3) 事実に基づき、不確かなことは断定しない。";

fn tone(style: GuideStyle) -> &'static str {
    match style {
        GuideStyle::Friendly => "親しみやすく、やさしい日本語で",
        GuideStyle::Energetic => "元気でワクワクする語り口で",
        GuideStyle::Calm => "落ち着いた語り口で",
    }
}

fn audience_line(audience: &Audience) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(age) = audience.age {
        parts.push(format!("年齢={age}"));
    }
    if let Some(gender) = audience.gender.as_deref().filter(|g| !g.trim().is_empty()) {
        parts.push(format!("性別={gender}"));
    }
    if !audience.interests.is_empty() {
        parts.push(format!("興味={}", audience.interests.join("、")));
    }
    (!parts.is_empty()).then(|| format!("- 聞き手: {}", parts.join(", ")))
}

/// User prompt for one destination.
pub fn compose_prompt(destination: &Destination, request: &GuideRequest) -> String {
    let mut prompt = format!(
        "{}、1〜2分で読める観光ガイドの台本を書いてください。\n\
         構成は 概要 → 見どころ → 歴史・豆知識 → おすすめの楽しみ方 → アクセス・注意点 の順です。\n\
         - 場所名: {}\n\
         - 住所: {}\n\
         - 座標: {}, {}",
        tone(request.style),
        destination.name,
        destination.address,
        destination.lat,
        destination.lng,
    );
    if let Some(line) = request.audience.as_ref().and_then(audience_line) {
        prompt.push('\n');
        prompt.push_str(&line);
    }
    prompt
}

/// Two-step guide pipeline over injected services.
#[derive(Clone)]
pub struct GuideService {
    destinations: Arc<dyn DestinationStore>,
    text: Arc<dyn TextGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    media: MediaStore,
}

impl GuideService {
    pub fn new(
        destinations: Arc<dyn DestinationStore>,
        text: Arc<dyn TextGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
        media: MediaStore,
    ) -> Self {
        Self {
            destinations,
            text,
            speech,
            media,
        }
    }

    /// Generate and store a guide for a saved destination.
    ///
    /// Text-generation failures are returned; speech failures fall back to
    /// storing the text. Only a failed fallback write is a media error.
    pub async fn generate(
        &self,
        destination_id: &str,
        request: &GuideRequest,
    ) -> Result<GuideResponse, SerendigoCoreError> {
        let destination = self.destinations.get(destination_id).await?;
        let prompt = compose_prompt(&destination, request);
        let text = self.text.generate(SYSTEM_PROMPT, &prompt).await?;

        let media = match self.synthesize(&text, request.voice.as_deref()).await {
            Ok(stored) => {
                info!(
                    "guide stored (destination={}, kind=audio, path={})",
                    destination.id,
                    stored.path.display()
                );
                GuideMedia::Synthesized {
                    audio_url: stored.url,
                }
            }
            Err(cause) => {
                warn!(
                    "speech synthesis failed (destination={}, error={cause})",
                    destination.id
                );
                let stored = self
                    .media
                    .write_guide("txt", text.as_bytes())
                    .await?;
                info!(
                    "guide stored (destination={}, kind=text_fallback, path={})",
                    destination.id,
                    stored.path.display()
                );
                GuideMedia::Fallback {
                    text_url: stored.url,
                }
            }
        };
        Ok(GuideResponse {
            destination_id: destination.id,
            text,
            media,
        })
    }

    /// Synthesize and store audio; any failure is reported as its message.
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<StoredMedia, String> {
        let audio = self
            .speech
            .synthesize(text, voice)
            .await
            .map_err(|err| err.to_string())?;
        self.media
            .write_guide("mp3", &audio)
            .await
            .map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn destination() -> Destination {
        Destination {
            id: "d-1".to_string(),
            place_id: "p-1".to_string(),
            name: "清水寺".to_string(),
            address: "京都府京都市東山区清水".to_string(),
            lat: 34.994856,
            lng: 135.785046,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn prompt_includes_place_and_tone() {
        let prompt = compose_prompt(&destination(), &GuideRequest::default());
        assert!(prompt.starts_with("親しみやすく"));
        assert!(prompt.contains("清水寺"));
        assert!(prompt.contains("京都府京都市東山区清水"));
        assert!(prompt.contains("34.994856, 135.785046"));
        assert!(!prompt.contains("聞き手"));
    }

    #[test]
    fn prompt_describes_audience() {
        let request = GuideRequest {
            style: GuideStyle::Calm,
            audience: Some(Audience {
                age: Some(34),
                gender: None,
                interests: vec!["歴史".to_string(), "建築".to_string()],
            }),
            voice: None,
        };
        let prompt = compose_prompt(&destination(), &request);
        assert!(prompt.starts_with("落ち着いた"));
        assert!(prompt.contains("- 聞き手: 年齢=34, 興味=歴史、建築"));
    }
}
