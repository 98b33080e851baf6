//! Environment variable overrides applied on top of file layers.

use crate::SerendigoConfig;
use log::{debug, info};

/// Environment variables recognized by [`SerendigoConfig::apply_env`].
pub const ENV_KEYS: &[&str] = &[
    "GOOGLE_PLACES_API_KEY",
    "HOTPEPPER_API_KEY",
    "CONNPASS_API_KEY",
    "OPENAI_API_KEY",
    "OPENAI_TEXT_MODEL",
    "MEDIA_ROOT",
    "DB_URL",
    "SERENDIGO_BIND",
];

impl SerendigoConfig {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values count as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut applied = 0usize;
        let mut set = |slot: &mut Option<String>, key: &str| {
            if let Some(value) = get(key) {
                debug!("config override from env (key={key})");
                *slot = Some(value);
                applied += 1;
            }
        };
        set(&mut self.providers.google.api_key, "GOOGLE_PLACES_API_KEY");
        set(&mut self.providers.hotpepper.api_key, "HOTPEPPER_API_KEY");
        set(&mut self.providers.events.api_key, "CONNPASS_API_KEY");
        set(&mut self.guide.api_key, "OPENAI_API_KEY");

        let mut replace = |slot: &mut String, key: &str| {
            if let Some(value) = get(key) {
                debug!("config override from env (key={key})");
                *slot = value;
                applied += 1;
            }
        };
        replace(&mut self.guide.text_model, "OPENAI_TEXT_MODEL");
        replace(&mut self.media.root, "MEDIA_ROOT");
        replace(&mut self.store.database_url, "DB_URL");
        replace(&mut self.server.bind, "SERENDIGO_BIND");

        if applied > 0 {
            info!("applied environment overrides (count={applied})");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::SerendigoConfig;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_keys_and_paths() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("GOOGLE_PLACES_API_KEY", "g-key"),
            ("HOTPEPPER_API_KEY", "  "),
            ("MEDIA_ROOT", "/var/lib/serendigo/media"),
            ("DB_URL", "sqlite:///tmp/history.db"),
        ]);
        let mut config = SerendigoConfig::default();
        config.apply_env_with(|key| vars.get(key).map(|value| value.to_string()));

        assert_eq!(config.providers.google.api_key.as_deref(), Some("g-key"));
        assert_eq!(config.providers.hotpepper.api_key, None);
        assert_eq!(config.media.root, "/var/lib/serendigo/media");
        assert_eq!(config.store.database_url, "sqlite:///tmp/history.db");
        assert_eq!(config.server.bind, "0.0.0.0:8000");
    }
}
