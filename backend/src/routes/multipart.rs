//! Staging of multipart file uploads on local temporary storage

use axum::extract::{multipart::MultipartError, Multipart};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::image_storage::{
    sanitize_file_name, ImageStorageError, ImageStorageResult, StagedUpload,
};

/// Form field carrying the uploaded image
pub const IMAGE_FIELD: &str = "image";

/// Streams the `image` field of a multipart body into a temporary file
///
/// Returns `Ok(None)` when the form has no `image` field or the field carries
/// no file name, which is what browsers send when no file was selected.
///
/// # Errors
///
/// Returns `ImageStorageError::InvalidInput` if the body is malformed or too large
/// Returns `ImageStorageError::Io` if the temporary file cannot be written
pub async fn stage_image(mut multipart: Multipart) -> ImageStorageResult<Option<StagedUpload>> {
    while let Some(mut field) = multipart.next_field().await.map_err(invalid_body)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .map(sanitize_file_name)
            .unwrap_or_default()
            .to_string();

        if original_name.is_empty() {
            return Ok(None);
        }

        let content_type = field
            .content_type()
            .map_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string(), ToString::to_string);

        let temp_file = NamedTempFile::new()?;
        let mut file = tokio::fs::File::from_std(temp_file.reopen()?);
        let mut size = 0;

        while let Some(chunk) = field.chunk().await.map_err(invalid_body)? {
            size += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(
            "Staged {} ({} bytes, {}) at {}",
            original_name,
            size,
            content_type,
            temp_file.path().display()
        );

        return Ok(Some(StagedUpload::new(
            temp_file,
            original_name,
            content_type,
        )));
    }

    Ok(None)
}

fn invalid_body(err: MultipartError) -> ImageStorageError {
    ImageStorageError::InvalidInput(err.body_text())
}
