//! Locating and reading config layer files.

use super::{ConfigLayer, ConfigLayerSource, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE, schema};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A candidate location for one layer.
#[derive(Debug, Clone)]
pub(super) struct LayerSlot {
    pub source: ConfigLayerSource,
    pub path: PathBuf,
    /// Runtime paths must exist; discovered locations may be absent.
    pub required: bool,
}

impl LayerSlot {
    pub fn discovered(source: ConfigLayerSource, path: PathBuf) -> Self {
        Self {
            source,
            path,
            required: false,
        }
    }

    pub fn runtime(path: PathBuf) -> Self {
        Self {
            source: ConfigLayerSource::Runtime,
            path,
            required: true,
        }
    }

    /// `user(/home/me/.serendigo/serendigo.json5)` style label for errors.
    pub fn label(&self) -> String {
        format!("{}({})", self.source.as_str(), self.path.display())
    }
}

/// A layer that was found, parsed, and schema-checked.
#[derive(Debug, Clone)]
pub(super) struct LoadedLayer {
    pub meta: ConfigLayer,
    pub value: Value,
}

pub(super) fn parse_str(contents: &str, layer: &str) -> Result<Value, ConfigError> {
    json5::from_str(contents).map_err(|source| ConfigError::Parse {
        layer: layer.to_string(),
        source,
    })
}

pub(super) fn parse_file(path: &Path, layer: &str) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&contents, layer)
}

/// Read one slot. An absent optional file yields `None`.
pub(super) fn read_slot(slot: &LayerSlot) -> Result<Option<LoadedLayer>, ConfigError> {
    if !slot.required && !slot.path.is_file() {
        debug!("config layer absent ({})", slot.label());
        return Ok(None);
    }
    let label = slot.label();
    let value = parse_file(&slot.path, &label)?;
    schema::validate_layer_schema(&value, &label)?;
    debug!("config layer read ({label})");
    Ok(Some(LoadedLayer {
        meta: ConfigLayer {
            source: slot.source,
            path: Some(slot.path.clone()),
        },
        value,
    }))
}

/// Canonical working directory; a directory that does not exist yet is kept as given.
pub(super) fn resolve_cwd(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(source) => Err(ConfigError::WorkingDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Identity used to avoid reading the same file twice.
pub(super) fn file_identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

pub(super) fn system_config_path() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        Some(PathBuf::from(super::SYSTEM_CONFIG_PATH))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// `~/.serendigo/serendigo.json5`, when a home directory is known.
pub(super) fn user_config_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
    )
}
