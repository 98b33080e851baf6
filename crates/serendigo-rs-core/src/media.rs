//! Generated guide files under the media root.

use crate::error::SerendigoCoreError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Subdirectory (and URL segment) holding guide files.
pub const GUIDES_DIR: &str = "guides";

/// A file written by [`MediaStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub path: PathBuf,
    pub url: String,
}

/// Writes uniquely named files and maps them to public URLs.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    public_prefix: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn guides_dir(&self) -> PathBuf {
        self.root.join(GUIDES_DIR)
    }

    /// Write `contents` to `guides/<uuid>.<extension>`.
    pub async fn write_guide(
        &self,
        extension: &str,
        contents: &[u8],
    ) -> Result<StoredMedia, SerendigoCoreError> {
        let dir = self.guides_dir();
        let file_name = format!("{}.{extension}", Uuid::new_v4());
        let path = dir.join(&file_name);
        let written = match tokio::fs::create_dir_all(&dir).await {
            Ok(()) => tokio::fs::write(&path, contents).await,
            Err(err) => Err(err),
        };
        if let Err(source) = written {
            return Err(SerendigoCoreError::Media { path, source });
        }
        Ok(StoredMedia {
            url: format!("{}/{GUIDES_DIR}/{file_name}", self.public_prefix),
            path,
        })
    }
}
