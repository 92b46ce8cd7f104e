//! Server configuration.
//!
//! Resolved once at process startup and passed into [`AppState`](crate::AppState). Handlers
//! never read environment variables.

use hims_files::{AttachmentConfig, AttachmentMode, DEFAULT_MAX_IMAGE_BYTES};
use std::path::PathBuf;

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_OPERATORS_FILE: &str = "operators.yaml";
pub const DEFAULT_ATTACHMENT_DIR: &str = "attachments";
pub const DEFAULT_ATTACHMENT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Everything the REST server needs to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: String,
    pub operators_file: PathBuf,
    pub attachments: AttachmentConfig,
    pub max_image_bytes: u64,
}

impl ServerConfig {
    /// Reads the `HIMS_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Unset and blank values take their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let mode = attachment_mode_from_env_value(var("HIMS_ATTACHMENT_MODE"))?;
        let max_image_bytes = max_image_bytes_from_env_value(var("HIMS_MAX_IMAGE_BYTES"))?;

        Ok(Self {
            addr: var("HIMS_REST_ADDR").unwrap_or_else(|| DEFAULT_REST_ADDR.into()),
            operators_file: var("HIMS_OPERATORS_FILE")
                .unwrap_or_else(|| DEFAULT_OPERATORS_FILE.into())
                .into(),
            attachments: AttachmentConfig {
                mode,
                root: var("HIMS_ATTACHMENT_DIR")
                    .unwrap_or_else(|| DEFAULT_ATTACHMENT_DIR.into())
                    .into(),
                public_base_url: var("HIMS_ATTACHMENT_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_ATTACHMENT_BASE_URL.into()),
            },
            max_image_bytes,
        })
    }
}

/// Parses the attachment mode. `None` means the content store.
pub fn attachment_mode_from_env_value(value: Option<String>) -> ConfigResult<AttachmentMode> {
    value
        .map(|v| {
            v.parse::<AttachmentMode>()
                .map_err(|reason| ConfigError::InvalidValue {
                    name: "HIMS_ATTACHMENT_MODE",
                    value: v.clone(),
                    reason,
                })
        })
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Parses the image size limit in bytes. Zero is rejected.
pub fn max_image_bytes_from_env_value(value: Option<String>) -> ConfigResult<u64> {
    let Some(v) = value else {
        return Ok(DEFAULT_MAX_IMAGE_BYTES);
    };
    match v.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            name: "HIMS_MAX_IMAGE_BYTES",
            value: v,
            reason: "must be greater than zero".into(),
        }),
        Ok(bytes) => Ok(bytes),
        Err(e) => Err(ConfigError::InvalidValue {
            name: "HIMS_MAX_IMAGE_BYTES",
            value: v,
            reason: e.to_string(),
        }),
    }
}
