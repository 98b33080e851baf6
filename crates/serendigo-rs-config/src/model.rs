//! Configuration schema for Serendigo.

use serde::{Deserialize, Serialize};

/// Root config for the Serendigo backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SerendigoConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub guide: GuideConfig,
}

impl SerendigoConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> SerendigoConfigBuilder {
        SerendigoConfigBuilder::new()
    }
}

/// Builder for assembling a `SerendigoConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct SerendigoConfigBuilder {
    config: SerendigoConfig,
}

impl SerendigoConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SerendigoConfig::default(),
        }
    }

    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    pub fn providers(mut self, providers: ProvidersConfig) -> Self {
        self.config.providers = providers;
        self
    }

    pub fn search(mut self, search: SearchConfig) -> Self {
        self.config.search = search;
        self
    }

    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    pub fn media(mut self, media: MediaConfig) -> Self {
        self.config.media = media;
        self
    }

    pub fn guide(mut self, guide: GuideConfig) -> Self {
        self.config.guide = guide;
        self
    }

    /// Finalize and return the built `SerendigoConfig`.
    pub fn build(self) -> SerendigoConfig {
        self.config
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

/// Origins of the bundled web front-end during development.
fn default_cors_origins() -> Vec<String> {
    ["http://localhost:3000", "http://127.0.0.1:3000", "http://0.0.0.0:3000"]
        .iter()
        .map(|origin| origin.to_string())
        .collect()
}

/// Settings shared by every external data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Per-call timeout applied to each provider.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Response language requested from providers that support it.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub google: GooglePlacesConfig,
    #[serde(default)]
    pub hotpepper: HotpepperConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            language: default_language(),
            google: GooglePlacesConfig::default(),
            hotpepper: HotpepperConfig::default(),
            events: EventsConfig::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_language() -> String {
    "ja".to_string()
}

/// Generic places lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GooglePlacesConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_google_base_url")]
    pub base_url: String,
}

impl Default for GooglePlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_google_base_url(),
        }
    }
}

fn default_google_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

/// Food-specific lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotpepperConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_hotpepper_base_url")]
    pub base_url: String,
}

impl Default for HotpepperConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_hotpepper_base_url(),
        }
    }
}

fn default_hotpepper_base_url() -> String {
    "https://webservice.recruit.co.jp/hotpepper/gourmet/v1/".to_string()
}

/// Reverse geocoding plus event search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,
    #[serde(default = "default_events_search_url")]
    pub search_url: String,
    /// Optional key sent as `X-API-Key` to the event search.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_events_count")]
    pub count: u32,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            geocoder_url: default_geocoder_url(),
            search_url: default_events_search_url(),
            api_key: None,
            user_agent: default_user_agent(),
            count: default_events_count(),
        }
    }
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_events_search_url() -> String {
    "https://connpass.com/api/v1/event/".to_string()
}

fn default_user_agent() -> String {
    "Serendigo/1.0".to_string()
}

fn default_events_count() -> u32 {
    30
}

/// Search engine tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Brand substrings dropped when `local_only` is requested. `None` keeps the
    /// built-in table.
    #[serde(default)]
    pub chain_brands: Option<Vec<String>>,
    /// Number of recent history rows scanned in history-only mode.
    #[serde(default = "default_history_scan_limit")]
    pub history_scan_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            chain_brands: None,
            history_scan_limit: default_history_scan_limit(),
        }
    }
}

fn default_history_scan_limit() -> usize {
    100
}

/// Record store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./serendigo.db".to_string()
}

/// Generated media storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: String,
    /// URL prefix the media root is served under.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            public_prefix: default_public_prefix(),
        }
    }
}

fn default_media_root() -> String {
    "./media".to_string()
}

fn default_public_prefix() -> String {
    "/media".to_string()
}

/// Text generation and speech synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_guide_base_url")]
    pub base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_speech_model")]
    pub speech_model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout for generation and synthesis calls.
    #[serde(default = "default_guide_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_guide_base_url(),
            text_model: default_text_model(),
            speech_model: default_speech_model(),
            voice: default_voice(),
            temperature: default_temperature(),
            timeout_secs: default_guide_timeout_secs(),
        }
    }
}

fn default_guide_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_speech_model() -> String {
    "gpt-4o-mini-tts".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_temperature() -> f32 {
    0.6
}

fn default_guide_timeout_secs() -> u64 {
    60
}
