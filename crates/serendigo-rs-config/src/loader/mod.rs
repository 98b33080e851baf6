//! Layered configuration loader.
//!
//! Layers are read in precedence order (system, user, cwd, then runtime
//! paths), schema-checked one by one, deep-merged, and decoded once.

mod layer_io;
mod merge;
mod schema;

#[cfg(test)]
mod tests;

use crate::{ConfigError, SerendigoConfig};
use layer_io::{LayerSlot, LoadedLayer};
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Config file name looked up in the cwd and user layers.
const DEFAULT_CONFIG_FILE: &str = "serendigo.json5";
/// Directory under the home directory holding the user layer.
const DEFAULT_CONFIG_DIR: &str = ".serendigo";

#[cfg(unix)]
const SYSTEM_CONFIG_PATH: &str = "/etc/serendigo/serendigo.json5";

/// Effective config plus the layers that produced it.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub config: SerendigoConfig,
    /// Layers that were actually read, lowest precedence first.
    pub layers: Vec<ConfigLayer>,
}

/// Where a layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    System,
    User,
    Cwd,
    /// `--config` paths; applied last, in the order given.
    Runtime,
}

impl ConfigLayerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLayerSource::System => "system",
            ConfigLayerSource::User => "user",
            ConfigLayerSource::Cwd => "cwd",
            ConfigLayerSource::Runtime => "runtime",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub source: ConfigLayerSource,
    pub path: Option<PathBuf>,
}

/// Where to look for layers.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Directory searched for `serendigo.json5`.
    pub cwd: PathBuf,
    /// Defaults to `/etc/serendigo/serendigo.json5` on Unix.
    pub system_config_path: Option<PathBuf>,
    /// Defaults to `~/.serendigo/serendigo.json5`.
    pub user_config_path: Option<PathBuf>,
    /// Files that must exist; merged last.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: layer_io::system_config_path(),
            user_config_path: layer_io::user_config_path(),
            runtime_paths: Vec::new(),
        }
    }

    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }

    fn slots(&self, cwd: &Path) -> Vec<LayerSlot> {
        let discovered = [
            (ConfigLayerSource::System, self.system_config_path.clone()),
            (ConfigLayerSource::User, self.user_config_path.clone()),
            (ConfigLayerSource::Cwd, Some(cwd.join(DEFAULT_CONFIG_FILE))),
        ];
        discovered
            .into_iter()
            .filter_map(|(source, path)| path.map(|path| LayerSlot::discovered(source, path)))
            .chain(self.runtime_paths.iter().cloned().map(LayerSlot::runtime))
            .collect()
    }
}

impl SerendigoConfig {
    /// Read one file without layering or environment overrides.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config file (path={})", path.display());
        let label = format!("file({})", path.display());
        let value = layer_io::parse_file(path, &label)?;
        decode(value, &label)
    }

    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading inline config (len={})", contents.len());
        let value = layer_io::parse_str(contents, "inline")?;
        decode(value, "inline")
    }

    /// Layered load with the default system and user locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = layer_io::resolve_cwd(&options.cwd)?;
        let mut merged = Value::Object(Map::new());
        let mut layers = Vec::new();
        let mut seen = HashSet::new();

        for slot in options.slots(&cwd) {
            if !slot.required && !seen.insert(layer_io::file_identity(&slot.path)) {
                debug!("config layer already read ({})", slot.label());
                continue;
            }
            let Some(LoadedLayer { meta, value }) = layer_io::read_slot(&slot)? else {
                continue;
            };
            merge::merge_json_values(&mut merged, &value);
            layers.push(meta);
        }

        let config = decode(merged, "effective")?;
        info!(
            "config loaded (layers={}, sources={})",
            layers.len(),
            layers
                .iter()
                .map(|layer| layer.source.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.providers.timeout_secs == 0 {
            return Err(ConfigError::InvalidField {
                path: "providers.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.guide.timeout_secs == 0 {
            return Err(ConfigError::InvalidField {
                path: "guide.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.search.history_scan_limit == 0 {
            return Err(ConfigError::InvalidField {
                path: "search.history_scan_limit".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.store.database_url.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                path: "store.database_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if !self.media.public_prefix.starts_with('/') {
            return Err(ConfigError::InvalidField {
                path: "media.public_prefix".to_string(),
                message: "must start with '/'".to_string(),
            });
        }
        if let Some(brands) = &self.search.chain_brands {
            if brands.iter().any(|brand| brand.trim().is_empty()) {
                return Err(ConfigError::Invalid(
                    "search.chain_brands entries must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn decode(value: Value, label: &str) -> Result<SerendigoConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: SerendigoConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
