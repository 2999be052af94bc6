use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{retry::RetryConfig, Builder as S3ConfigBuilder},
    error::SdkError,
    primitives::ByteStream,
    Client as S3Client,
};
use chrono::Utc;
use tracing::{debug, error, info, instrument};

use super::{
    new_upload_key, ImageStorageError, ImageStorageResult, ImageStore, ObjectUrlBuilder,
    StagedUpload, StoredImage, UPLOADS_PREFIX,
};

/// Image store backed by an S3 bucket
pub struct S3ImageStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    urls: ObjectUrlBuilder,
}

impl S3ImageStore {
    /// Creates a new image store client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client (region, credentials, timeouts)
    /// * `bucket_name` - Bucket holding the gallery
    /// * `urls` - Builder for the public URL of each object
    #[must_use]
    pub const fn new(
        s3_client: Arc<S3Client>,
        bucket_name: String,
        urls: ObjectUrlBuilder,
    ) -> Self {
        Self {
            s3_client,
            bucket_name,
            urls,
        }
    }

    fn stored_image(&self, key: String) -> StoredImage {
        StoredImage::from_key(key, &self.urls)
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    /// Uploads the staged file under `uploads/<millis>-<originalName>`
    ///
    /// # Errors
    ///
    /// Returns `ImageStorageError::InvalidInput` if the original name is empty
    /// Returns `ImageStorageError::Io` if the staged file cannot be opened
    /// Returns `ImageStorageError::StoreWrite` if the `PutObject` call fails
    #[instrument(skip(self, upload), fields(original_name = upload.original_name()))]
    async fn upload(&self, upload: &StagedUpload) -> ImageStorageResult<StoredImage> {
        if upload.original_name().is_empty() {
            return Err(ImageStorageError::InvalidInput(
                "original file name is empty".to_string(),
            ));
        }

        let key = new_upload_key(Utc::now().timestamp_millis(), upload.original_name());

        let body = ByteStream::from_path(upload.path())
            .await
            .map_err(|e| ImageStorageError::Io(std::io::Error::other(e)))?;

        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(upload.content_type())
            .body(body)
            .customize()
            .config_override(S3ConfigBuilder::default().retry_config(RetryConfig::disabled()))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to upload object {}: {:?}", key, e);
                ImageStorageError::from(e)
            })?;

        info!("Uploaded object: {}", key);

        Ok(self.stored_image(key))
    }

    /// Lists the whole `uploads/` prefix, following continuation tokens
    ///
    /// # Errors
    ///
    /// Returns `ImageStorageError::StoreRead` if any listing call fails
    #[instrument(skip(self))]
    async fn list(&self) -> ImageStorageResult<Vec<StoredImage>> {
        let mut images = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .s3_client
                .list_objects_v2()
                .bucket(&self.bucket_name)
                .prefix(UPLOADS_PREFIX)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| {
                    error!("Failed to list objects in {}: {:?}", self.bucket_name, e);
                    ImageStorageError::from(e)
                })?;

            images.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    // Folder placeholder created by the S3 console
                    .filter(|key| *key != UPLOADS_PREFIX)
                    .map(|key| self.stored_image(key.to_string())),
            );

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("Listed {} objects", images.len());

        Ok(images)
    }

    /// Deletes the object under `key`
    ///
    /// S3 answers `204` for missing keys. Some compatible stores answer `404`,
    /// which is mapped to success as well.
    ///
    /// # Errors
    ///
    /// Returns `ImageStorageError::StoreWrite` for transport, auth or permission failures
    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> ImageStorageResult<()> {
        let result = self
            .s3_client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => {
                info!("Deleted object: {}", key);
                Ok(())
            }
            Err(SdkError::ServiceError(service_err))
                if service_err.raw().status().as_u16() == 404 =>
            {
                debug!("Object already absent: {}", key);
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete object {}: {:?}", key, e);
                Err(ImageStorageError::from(e))
            }
        }
    }
}
