//! Error types for image storage operations

use aws_sdk_s3::{
    error::{DisplayErrorContext, SdkError},
    operation::{
        delete_object::DeleteObjectError, list_objects_v2::ListObjectsV2Error,
        put_object::PutObjectError,
    },
};
use thiserror::Error;

/// Result type for image storage operations
pub type ImageStorageResult<T> = Result<T, ImageStorageError>;

/// Errors that can occur while talking to the object store
#[derive(Error, Debug)]
pub enum ImageStorageError {
    /// The caller supplied a malformed request (no file, empty name, foreign key)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Listing or reading from the store failed
    #[error("Object store read error: {0}")]
    StoreRead(String),

    /// Writing to or deleting from the store failed
    #[error("Object store write error: {0}")]
    StoreWrite(String),

    /// The staged upload could not be written or read locally
    #[error("Local staging error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SdkError<ListObjectsV2Error>> for ImageStorageError {
    fn from(error: SdkError<ListObjectsV2Error>) -> Self {
        Self::StoreRead(DisplayErrorContext(&error).to_string())
    }
}

impl From<SdkError<PutObjectError>> for ImageStorageError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        Self::StoreWrite(DisplayErrorContext(&error).to_string())
    }
}

impl From<SdkError<DeleteObjectError>> for ImageStorageError {
    fn from(error: SdkError<DeleteObjectError>) -> Self {
        Self::StoreWrite(DisplayErrorContext(&error).to_string())
    }
}
