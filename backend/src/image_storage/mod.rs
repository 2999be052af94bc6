//! S3-based image storage
//!
//! This module is the only place that talks to the object store. The bucket is
//! the single source of truth for the gallery: nothing is cached in process.

mod error;
mod key;
mod s3;

use std::path::Path;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Serialize;
use tempfile::NamedTempFile;

pub use error::{ImageStorageError, ImageStorageResult};
pub use key::{
    display_name, encode_key, new_upload_key, sanitize_file_name, ObjectUrlBuilder,
    UPLOADS_PREFIX,
};
pub use s3::S3ImageStore;

/// One image stored in the bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Full object key, e.g. `uploads/1700000000000-cat.png`
    pub key: String,
    /// Presentation name derived from the key
    pub display_name: String,
    /// Public retrieval URL derived from bucket, region and key
    pub url: String,
}

impl StoredImage {
    /// Projects an object key into the display model
    #[must_use]
    pub fn from_key(key: String, urls: &ObjectUrlBuilder) -> Self {
        Self {
            display_name: display_name(&key).to_string(),
            url: urls.url_for(&key),
            key,
        }
    }
}

/// An uploaded file staged on local temporary storage
///
/// The backing file is removed when the value is dropped, so the staging area
/// is cleaned up whether or not the upload to the store succeeded.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    original_name: String,
    content_type: String,
}

impl StagedUpload {
    /// Wraps an already written temporary file
    #[must_use]
    pub const fn new(
        file: NamedTempFile,
        original_name: String,
        content_type: String,
    ) -> Self {
        Self {
            file,
            original_name,
            content_type,
        }
    }

    /// Stages an in-memory buffer in a fresh temporary file
    ///
    /// # Errors
    ///
    /// Returns `ImageStorageError::Io` if the temporary file cannot be written
    pub fn from_bytes(
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> ImageStorageResult<Self> {
        use std::io::Write;

        let mut file = NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self::new(
            file,
            original_name.to_string(),
            content_type.to_string(),
        ))
    }

    /// Location of the staged bytes
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// File name as sent by the client
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Declared content type of the file
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Create, list and delete operations against the object store
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Streams a staged file to the store under a freshly generated key
    ///
    /// Must not be retried automatically: a retry after an ambiguous failure
    /// can leave a duplicate object behind.
    async fn upload(&self, upload: &StagedUpload) -> ImageStorageResult<StoredImage>;

    /// Lists every object under the `uploads/` prefix
    ///
    /// Ordering is whatever the store returns.
    async fn list(&self) -> ImageStorageResult<Vec<StoredImage>>;

    /// Deletes the object stored under the exact `key`
    ///
    /// Deleting a key that doesn't exist succeeds.
    async fn delete(&self, key: &str) -> ImageStorageResult<()>;
}
