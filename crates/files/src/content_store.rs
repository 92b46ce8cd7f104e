//! Content-addressed attachment storage.
//!
//! Files are stored under their SHA-256 digest:
//!
//! ```text
//! <root>/files/sha256/<shard1>/<shard2>/<hash>
//! ```
//!
//! and exposed as `<public base url>/files/sha256/<hash>`. Storing the same bytes twice is not
//! an error; both calls resolve to the same URL. Writes go to a uniquely named staging file that
//! is renamed into place, so two uploads racing on identical content cannot leave a partial file.

use crate::{
    AttachmentFile, AttachmentMode, AttachmentPort, UploadError, UploadResult, FILES_FOLDER_NAME,
};
use async_trait::async_trait;
use hims_uuid::EntityId;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

const HASH_FOLDER_NAME: &str = "sha256";

/// Default [`AttachmentPort`]: writes files to local content-addressed storage.
#[derive(Debug)]
pub struct ContentStoreUploader {
    root_directory: PathBuf,
    public_base_url: String,
}

impl ContentStoreUploader {
    /// Creates an uploader rooted at `root_directory`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidRootDirectory`] if the directory does not exist, is not a
    /// directory, or cannot be canonicalised.
    pub fn new(root_directory: &Path, public_base_url: &str) -> UploadResult<Self> {
        if !root_directory.is_dir() {
            return Err(UploadError::InvalidRootDirectory(format!(
                "Not an existing directory: {}",
                root_directory.display()
            )));
        }

        let root_directory = root_directory.canonicalize().map_err(|e| {
            UploadError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                root_directory.display(),
                e
            ))
        })?;

        Ok(Self {
            root_directory,
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    /// Public URL for a stored hash.
    pub fn url_for(&self, hash: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.public_base_url, FILES_FOLDER_NAME, HASH_FOLDER_NAME, hash
        )
    }

    /// Reads back a stored file.
    ///
    /// # Errors
    ///
    /// - [`UploadError::InvalidHash`] unless `hash` is 64 lowercase hex characters
    /// - [`UploadError::NotFound`] if nothing is stored under it
    pub async fn read(&self, hash: &str) -> UploadResult<Vec<u8>> {
        if !is_sha256_hex(hash) {
            return Err(UploadError::InvalidHash(hash.to_owned()));
        }
        let path = self.storage_path(hash);
        if !tokio::fs::try_exists(&path).await? {
            return Err(UploadError::NotFound(hash.to_owned()));
        }
        Ok(tokio::fs::read(&path).await?)
    }

    /// `files/sha256/<shard1>/<shard2>/<hash>`, relative to the root.
    fn relative_path(hash: &str) -> PathBuf {
        PathBuf::from(FILES_FOLDER_NAME)
            .join(HASH_FOLDER_NAME)
            .join(&hash[0..2])
            .join(&hash[2..4])
            .join(hash)
    }

    fn storage_path(&self, hash: &str) -> PathBuf {
        self.root_directory.join(Self::relative_path(hash))
    }
}

#[async_trait]
impl AttachmentPort for ContentStoreUploader {
    fn mode(&self) -> AttachmentMode {
        AttachmentMode::Store
    }

    async fn upload(&self, file: &AttachmentFile) -> UploadResult<String> {
        let hash = hex::encode(Sha256::digest(&file.bytes));
        let storage_path = self.storage_path(&hash);
        let url = self.url_for(&hash);

        if tokio::fs::try_exists(&storage_path).await? {
            tracing::debug!(%hash, file_name = %file.file_name, "attachment already stored");
            return Ok(url);
        }

        if let Some(parent) = storage_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let staging = storage_path.with_extension(format!("{}.tmp", EntityId::new()));
        write_staged(&staging, &storage_path, &file.bytes).await?;

        tracing::info!(
            %hash,
            file_name = %file.file_name,
            size_bytes = file.size(),
            "attachment stored"
        );
        Ok(url)
    }
}

/// Writes `bytes` to `staging` and renames it over `target`. On any failure the staging file
/// is removed, so a half-written file never outlives the call.
async fn write_staged(staging: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let written = match tokio::fs::write(staging, bytes).await {
        Ok(()) => tokio::fs::rename(staging, target).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        match tokio::fs::remove_file(staging).await {
            Ok(()) => {}
            Err(cleanup) if cleanup.kind() == std::io::ErrorKind::NotFound => {}
            Err(cleanup) => {
                tracing::warn!(path = %staging.display(), error = %cleanup, "failed to remove staging file");
            }
        }
    }
    written
}

fn is_sha256_hex(input: &str) -> bool {
    input.len() == 64 && input.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::fixtures::{JPEG, PNG};
    use tempfile::TempDir;

    fn uploader(temp: &TempDir) -> ContentStoreUploader {
        ContentStoreUploader::new(temp.path(), "http://localhost:3000/").unwrap()
    }

    fn png() -> AttachmentFile {
        AttachmentFile::new("scan.png", "image/png", PNG.to_vec())
    }

    #[test]
    fn new_rejects_missing_or_non_directory_root() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            ContentStoreUploader::new(&temp.path().join("missing"), "http://x"),
            Err(UploadError::InvalidRootDirectory(_))
        ));

        let file = temp.path().join("file.txt");
        std::fs::write(&file, "not a directory").unwrap();
        assert!(matches!(
            ContentStoreUploader::new(&file, "http://x"),
            Err(UploadError::InvalidRootDirectory(_))
        ));
    }

    #[tokio::test]
    async fn upload_stores_under_sharded_hash_path() {
        let temp = TempDir::new().unwrap();
        let uploader = uploader(&temp);

        let url = uploader.upload(&png()).await.unwrap();
        let hash = hex::encode(Sha256::digest(PNG));
        assert_eq!(url, format!("http://localhost:3000/files/sha256/{hash}"));

        let on_disk = uploader
            .root_directory()
            .join("files/sha256")
            .join(&hash[0..2])
            .join(&hash[2..4])
            .join(&hash);
        assert_eq!(std::fs::read(on_disk).unwrap(), PNG);
        assert_eq!(uploader.read(&hash).await.unwrap(), PNG);
    }

    #[tokio::test]
    async fn identical_content_yields_identical_url() {
        let temp = TempDir::new().unwrap();
        let uploader = uploader(&temp);

        let first = uploader.upload(&png()).await.unwrap();
        let mut renamed = png();
        renamed.file_name = "copy.png".into();
        let second = uploader.upload(&renamed).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn racing_uploads_both_resolve() {
        let temp = TempDir::new().unwrap();
        let uploader = uploader(&temp);
        let (first, second) = (png(), png());
        let jpeg = AttachmentFile::new("photo.jpg", "image/jpeg", JPEG.to_vec());

        let (a, b, c) = tokio::join!(
            uploader.upload(&first),
            uploader.upload(&second),
            uploader.upload(&jpeg)
        );
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);

        let hash = c.rsplit('/').next().unwrap();
        assert_eq!(uploader.read(hash).await.unwrap(), JPEG);
    }

    #[tokio::test]
    async fn failed_staged_write_leaves_no_staging_file() {
        let temp = TempDir::new().unwrap();

        let target = temp.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), b"x").unwrap();
        let staging = temp.path().join("occupied.1.tmp");
        assert!(write_staged(&staging, &target, PNG).await.is_err());
        assert!(!staging.exists());

        let staging = temp.path().join("missing/dir/blob.tmp");
        let target = temp.path().join("missing/dir/blob");
        assert!(write_staged(&staging, &target, PNG).await.is_err());
        assert!(!staging.exists());
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn read_validates_hash_and_reports_missing() {
        let temp = TempDir::new().unwrap();
        let uploader = uploader(&temp);

        assert!(matches!(
            uploader.read("../../etc/passwd").await,
            Err(UploadError::InvalidHash(_))
        ));
        let absent = "0".repeat(64);
        assert!(matches!(
            uploader.read(&absent).await,
            Err(UploadError::NotFound(_))
        ));
    }

    #[test]
    fn mode_is_store() {
        let temp = TempDir::new().unwrap();
        assert_eq!(uploader(&temp).mode(), AttachmentMode::Store);
    }
}
