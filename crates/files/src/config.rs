//! Choosing an uploader at startup.

use crate::{AttachmentPort, ContentStoreUploader, DataUriUploader, UploadError, UploadResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// How attachments are turned into URLs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentMode {
    /// Content-addressed storage on disk.
    #[default]
    Store,
    /// Inline `data:` URIs.
    Offline,
}

impl AttachmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentMode::Store => "store",
            AttachmentMode::Offline => "offline",
        }
    }
}

impl fmt::Display for AttachmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttachmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(AttachmentMode::Store),
            "offline" => Ok(AttachmentMode::Offline),
            other => Err(format!("unknown attachment mode: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentConfig {
    pub mode: AttachmentMode,
    /// Storage root; unused in offline mode.
    pub root: PathBuf,
    /// Prefix for URLs handed back by the content store.
    pub public_base_url: String,
}

impl AttachmentConfig {
    /// Builds the uploader for the configured mode.
    ///
    /// # Errors
    ///
    /// See [`content_store`](Self::content_store).
    pub fn build(&self) -> UploadResult<Arc<dyn AttachmentPort>> {
        match self.mode {
            AttachmentMode::Store => Ok(Arc::new(self.content_store()?)),
            AttachmentMode::Offline => Ok(Arc::new(DataUriUploader::new())),
        }
    }

    /// The content-store uploader for this root, whatever the configured mode.
    ///
    /// The root directory is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidRootDirectory`] if the root cannot be created or used.
    pub fn content_store(&self) -> UploadResult<ContentStoreUploader> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            UploadError::InvalidRootDirectory(format!(
                "Cannot create {}: {}",
                self.root.display(),
                e
            ))
        })?;
        let uploader = ContentStoreUploader::new(&self.root, &self.public_base_url)?;
        tracing::info!(root = %uploader.root_directory().display(), "attachment store ready");
        Ok(uploader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("STORE".parse::<AttachmentMode>().unwrap(), AttachmentMode::Store);
        assert_eq!(" offline ".parse::<AttachmentMode>().unwrap(), AttachmentMode::Offline);
        assert!("s3".parse::<AttachmentMode>().is_err());
    }

    #[test]
    fn build_creates_missing_root_for_store_mode() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested/attachments");
        let config = AttachmentConfig {
            mode: AttachmentMode::Store,
            root: root.clone(),
            public_base_url: "http://localhost:3000".into(),
        };

        let port = config.build().unwrap();
        assert_eq!(port.mode(), AttachmentMode::Store);
        assert!(root.is_dir());
    }

    #[test]
    fn build_offline_ignores_root() {
        let config = AttachmentConfig {
            mode: AttachmentMode::Offline,
            root: PathBuf::from("/definitely/not/here"),
            public_base_url: String::new(),
        };
        assert_eq!(config.build().unwrap().mode(), AttachmentMode::Offline);
    }
}
