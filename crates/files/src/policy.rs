//! Pre-upload checks on type, size, and content.

use crate::{AttachmentFile, UploadError, UploadResult};

/// 5 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// 20 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "application/pdf",
];

/// What an attachment must satisfy before it is handed to an uploader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_image_bytes: u64,
    pub max_file_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| (*t).to_owned()).collect(),
        }
    }
}

impl UploadPolicy {
    pub fn with_max_image_bytes(self, max_image_bytes: u64) -> Self {
        Self {
            max_image_bytes,
            ..self
        }
    }

    /// Checks `file` against the allow-list, the size limit for its kind, and its sniffed
    /// content.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Empty`] for a zero-byte file
    /// - [`UploadError::UnsupportedType`] if the declared type is not allowed
    /// - [`UploadError::TooLarge`] if the file exceeds its limit
    /// - [`UploadError::MediaTypeMismatch`] if the bytes are not what the type claims
    pub fn check(&self, file: &AttachmentFile) -> UploadResult<()> {
        if file.bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let declared = file.media_type.trim().to_ascii_lowercase();
        if !self.allowed_types.iter().any(|t| *t == declared) {
            return Err(UploadError::UnsupportedType(file.media_type.clone()));
        }

        let limit = if declared.starts_with("image/") {
            self.max_image_bytes
        } else {
            self.max_file_bytes
        };
        if file.size() > limit {
            return Err(UploadError::TooLarge {
                size: file.size(),
                limit,
            });
        }

        let detected = infer::get(&file.bytes).map(|kind| kind.mime_type());
        if detected != Some(declared.as_str()) {
            return Err(UploadError::MediaTypeMismatch {
                declared,
                detected: detected.unwrap_or("unknown").to_owned(),
            });
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{JPEG, PDF, PNG};
    use super::*;

    #[test]
    fn accepts_matching_image_and_pdf() {
        let policy = UploadPolicy::default();
        assert!(policy
            .check(&AttachmentFile::new("a.png", "image/png", PNG.to_vec()))
            .is_ok());
        assert!(policy
            .check(&AttachmentFile::new("b.jpg", "IMAGE/JPEG", JPEG.to_vec()))
            .is_ok());
        assert!(policy
            .check(&AttachmentFile::new("c.pdf", "application/pdf", PDF.to_vec()))
            .is_ok());
    }

    #[test]
    fn rejects_oversized_image() {
        let mut bytes = PNG.to_vec();
        bytes.resize(DEFAULT_MAX_IMAGE_BYTES as usize + 1, 0);
        for media_type in ["image/png", "IMAGE/PNG", " Image/Png"] {
            let file = AttachmentFile::new("big.png", media_type, bytes.clone());
            assert!(file.is_image(), "{media_type}");
            let err = UploadPolicy::default().check(&file).unwrap_err();
            assert!(
                matches!(
                    err,
                    UploadError::TooLarge { limit, .. } if limit == DEFAULT_MAX_IMAGE_BYTES
                ),
                "{media_type}: {err}"
            );
        }
    }

    #[test]
    fn image_limit_is_configurable() {
        let mut bytes = PNG.to_vec();
        bytes.resize(1024, 0);
        let policy = UploadPolicy::default().with_max_image_bytes(512);
        assert!(matches!(
            policy.check(&AttachmentFile::new("a.png", "image/png", bytes)),
            Err(UploadError::TooLarge { size: 1024, limit: 512 })
        ));
    }

    #[test]
    fn rejects_content_that_lies_about_its_type() {
        let err = UploadPolicy::default()
            .check(&AttachmentFile::new("x.png", "image/png", JPEG.to_vec()))
            .unwrap_err();
        match err {
            UploadError::MediaTypeMismatch { declared, detected } => {
                assert_eq!(declared, "image/png");
                assert_eq!(detected, "image/jpeg");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = UploadPolicy::default()
            .check(&AttachmentFile::new("x.png", "image/png", b"plain text".to_vec()))
            .unwrap_err();
        assert!(matches!(err, UploadError::MediaTypeMismatch { .. }));
    }

    #[test]
    fn rejects_empty_and_unlisted_types() {
        let policy = UploadPolicy::default();
        assert!(matches!(
            policy.check(&AttachmentFile::new("e.png", "image/png", vec![])),
            Err(UploadError::Empty)
        ));
        assert!(matches!(
            policy.check(&AttachmentFile::new("s.svg", "image/svg+xml", b"<svg/>".to_vec())),
            Err(UploadError::UnsupportedType(_))
        ));
    }
}
