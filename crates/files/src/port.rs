//! The upload contract.

use crate::{AttachmentMode, UploadResult};
use async_trait::async_trait;

/// A file chosen by the operator, held in memory until it is uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    pub file_name: String,
    /// Media type as declared by the client.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Media types are case-insensitive, so `IMAGE/PNG` counts as an image.
    pub fn is_image(&self) -> bool {
        self.media_type
            .trim_start()
            .get(..6)
            .is_some_and(|kind| kind.eq_ignore_ascii_case("image/"))
    }
}

impl std::fmt::Debug for AttachmentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentFile")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Turns a file into a URL the record can reference.
///
/// Implementations do not validate the file; see [`UploadPolicy`](crate::UploadPolicy).
#[async_trait]
pub trait AttachmentPort: Send + Sync {
    /// Which configured mode this uploader implements.
    fn mode(&self) -> AttachmentMode;

    /// Uploads `file` and resolves to the URL it can be fetched from.
    async fn upload(&self, file: &AttachmentFile) -> UploadResult<String>;
}
