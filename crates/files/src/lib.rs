//! HIMS Attachment Storage
//!
//! This crate provides the upload contract used by any part of a consultation record that
//! embeds files or images, together with the two uploaders that implement it.
//!
//! ## Design Principles
//!
//! - Callers check a file against an [`UploadPolicy`] before uploading it. A rejected file never
//!   reaches the port and the record it was meant for is left untouched.
//! - [`AttachmentPort::upload`] resolves to a URL. The caller inserts that URL into the record
//!   only once the upload has succeeded, against the record as it is at that moment.
//! - The default uploader stores content-addressed files. Identical content always yields the
//!   same URL.
//! - The data-URI uploader exists for degraded/offline operation. It is never chosen
//!   implicitly.
//!
//! ## Content-Addressed Layout
//!
//! ```text
//! <attachment root>/
//! └── files/
//!     └── sha256/
//!         └── ab/
//!             └── cd/
//!                 └── abcd3f9e…
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use hims_files::{AttachmentConfig, AttachmentFile, AttachmentMode, AttachmentPort, UploadPolicy};
//!
//! # async fn run() -> Result<(), hims_files::UploadError> {
//! let config = AttachmentConfig {
//!     mode: AttachmentMode::Store,
//!     root: "attachments".into(),
//!     public_base_url: "http://localhost:3000".into(),
//! };
//! let uploader = config.build()?;
//!
//! let file = AttachmentFile::new("scan.png", "image/png", std::fs::read("scan.png")?);
//! UploadPolicy::default().check(&file)?;
//! let url = uploader.upload(&file).await?;
//! println!("stored at {url}");
//! # Ok(())
//! # }
//! ```

mod config;
mod content_store;
mod data_uri;
mod policy;
mod port;

pub use config::{AttachmentConfig, AttachmentMode};
pub use content_store::ContentStoreUploader;
pub use data_uri::DataUriUploader;
pub use policy::{UploadPolicy, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_IMAGE_BYTES};
pub use port::{AttachmentFile, AttachmentPort};

/// Folder under the attachment root that holds stored files.
pub const FILES_FOLDER_NAME: &str = "files";

/// Errors that can occur while checking, uploading, or reading an attachment.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The file has no content.
    #[error("File is empty")]
    Empty,

    /// The file exceeds the size limit for its type.
    #[error("File is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// The declared media type is not accepted.
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    /// The content does not match the declared media type.
    #[error("Declared media type {declared} does not match detected content {detected}")]
    MediaTypeMismatch { declared: String, detected: String },

    /// Attachment root does not exist or is not a directory.
    #[error("Invalid attachment root: {0}")]
    InvalidRootDirectory(String),

    /// Not a lowercase hex SHA-256 digest.
    #[error("Invalid content hash: {0}")]
    InvalidHash(String),

    /// No stored file has this hash.
    #[error("No file stored for hash {0}")]
    NotFound(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type UploadResult<T> = std::result::Result<T, UploadError>;
