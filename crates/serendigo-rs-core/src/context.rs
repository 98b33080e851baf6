//! Process-wide service graph built once from configuration.

use crate::chain::ChainFilter;
use crate::engine::{DetourEngine, ProviderSet};
use crate::error::SerendigoCoreError;
use crate::guide::GuideService;
use crate::media::MediaStore;
use log::info;
use serendigo_rs_config::SerendigoConfig;
use serendigo_rs_providers::{
    ConnpassEvents, GooglePlaces, HotPepper, OpenAiNarrator, PlaceDirectory,
};
use serendigo_rs_store::{DestinationStore, HistoryRecorder, SqliteStore};
use std::sync::Arc;
use std::time::Duration;

/// Everything the HTTP surface needs, with explicit ownership.
#[derive(Clone)]
pub struct ServiceContext {
    pub engine: DetourEngine,
    pub recorder: HistoryRecorder,
    pub destinations: Arc<dyn DestinationStore>,
    /// Autocomplete, details, and photos for picking a destination.
    pub places: Arc<dyn PlaceDirectory>,
    pub guide: GuideService,
    pub media: MediaStore,
}

impl ServiceContext {
    /// Wire the real store, providers, and narration clients.
    pub fn from_config(config: &SerendigoConfig) -> Result<Self, SerendigoCoreError> {
        let store = Arc::new(SqliteStore::open_url(&config.store.database_url)?);
        let google = Arc::new(GooglePlaces::from_config(&config.providers)?);
        let providers = ProviderSet {
            places: google.clone(),
            food: Arc::new(HotPepper::from_config(&config.providers)?),
            events: Arc::new(ConnpassEvents::from_config(&config.providers)?),
        };
        let chain_filter = match &config.search.chain_brands {
            Some(brands) => ChainFilter::new(brands),
            None => ChainFilter::with_default_brands(),
        }
        .map_err(|err| SerendigoCoreError::Config(format!("search.chain_brands: {err}")))?;

        let engine = DetourEngine::new(providers, store.clone())?
            .with_chain_filter(chain_filter)
            .with_provider_timeout(Duration::from_secs(config.providers.timeout_secs))
            .with_history_scan_limit(config.search.history_scan_limit);

        let narrator = Arc::new(OpenAiNarrator::from_config(&config.guide)?);
        let media = MediaStore::new(&config.media.root, &config.media.public_prefix);
        let guide = GuideService::new(store.clone(), narrator.clone(), narrator, media.clone());

        info!(
            "services ready (database_url={}, media_root={})",
            config.store.database_url, config.media.root
        );
        Ok(Self {
            engine,
            recorder: HistoryRecorder::new(store.clone()),
            destinations: store,
            places: google,
            guide,
            media,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serendigo_rs_config::{MediaConfig, StoreConfig};

    fn store(database_url: impl Into<String>) -> StoreConfig {
        StoreConfig {
            database_url: database_url.into(),
        }
    }

    #[test]
    fn builds_from_default_config_in_memory() {
        let temp = tempfile::tempdir().expect("tmp");
        let root = temp.path().to_string_lossy().to_string();
        let config = SerendigoConfig::builder()
            .store(store(":memory:"))
            .media(MediaConfig {
                root: root.clone(),
                ..MediaConfig::default()
            })
            .build();
        let context = ServiceContext::from_config(&config).expect("context");
        assert_eq!(context.media.root(), std::path::Path::new(&root));
    }

    #[test]
    fn invalid_store_location_is_an_error() {
        let temp = tempfile::tempdir().expect("tmp");
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, b"x").expect("blocker");
        let url = format!("sqlite:///{}", blocker.join("db.sqlite").display());
        let config = SerendigoConfig::builder().store(store(url)).build();
        assert!(matches!(
            ServiceContext::from_config(&config),
            Err(SerendigoCoreError::Store(_))
        ));
    }
}
