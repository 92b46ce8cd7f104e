//! Offline uploader that inlines files into the record.

use crate::{AttachmentFile, AttachmentMode, AttachmentPort, UploadResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Encodes each file as a `data:` URI instead of storing it.
///
/// Records grow by roughly a third of each file's size, so this is only for running without a
/// writable attachment store.
#[derive(Debug)]
pub struct DataUriUploader {
    _private: (),
}

impl DataUriUploader {
    pub fn new() -> Self {
        tracing::warn!("attachments will be embedded as data URIs; nothing is written to storage");
        Self { _private: () }
    }
}

impl Default for DataUriUploader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttachmentPort for DataUriUploader {
    fn mode(&self) -> AttachmentMode {
        AttachmentMode::Offline
    }

    async fn upload(&self, file: &AttachmentFile) -> UploadResult<String> {
        let media_type = file.media_type.trim().to_ascii_lowercase();
        Ok(format!("data:{};base64,{}", media_type, STANDARD.encode(&file.bytes)))
    }
}
