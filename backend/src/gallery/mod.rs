//! Gallery service: paginated listing, uploads and deletion
//!
//! Each operation is a self-contained request against the image store. The
//! full listing is fetched on every page view and paginated in process.

mod pagination;

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::image_storage::{
    ImageStorageError, ImageStorageResult, ImageStore, StagedUpload, StoredImage, UPLOADS_PREFIX,
};

pub use pagination::{PageNumber, Pagination};

/// Number of images per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Message shown when the listing is unavailable
pub const LIST_FAILED_MESSAGE: &str = "Failed to load images";
/// Message shown when an upload fails in the store
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload image";
/// Message shown when the form was submitted without a file
pub const NO_IMAGE_MESSAGE: &str = "No image uploaded";
/// Message shown when a delete fails in the store
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete image";

/// One page of the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPage {
    /// Images on this page, in listing order
    pub items: Vec<StoredImage>,
    /// 1-based number of this page
    pub current_page: usize,
    /// Total number of pages, at least 1
    pub total_pages: usize,
    /// Set when the page is rendered in a degraded state
    pub error: Option<String>,
}

impl GalleryPage {
    /// An empty first page carrying an error message
    #[must_use]
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            error: Some(message.into()),
        }
    }

    /// Whether the page carries an error
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Orchestrates the image store for the three gallery intents
pub struct GalleryService {
    store: Arc<dyn ImageStore>,
    page_size: usize,
}

impl GalleryService {
    /// Creates a new gallery service
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero
    #[must_use]
    pub fn new(store: Arc<dyn ImageStore>, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be at least 1");
        Self { store, page_size }
    }

    /// Returns one page of the gallery
    ///
    /// A store failure never propagates: the result is an empty first page
    /// with `error` set.
    #[instrument(skip(self))]
    pub async fn get_page(&self, page: PageNumber) -> GalleryPage {
        let images = match self.store.list().await {
            Ok(images) => images,
            Err(e) => {
                error!("Error fetching images: {e}");
                return GalleryPage::degraded(LIST_FAILED_MESSAGE);
            }
        };

        let pagination = Pagination::new(page, self.page_size);

        GalleryPage {
            items: pagination.slice(&images).to_vec(),
            current_page: page.get(),
            total_pages: pagination.total_pages(images.len()),
            error: None,
        }
    }

    /// Stores a newly uploaded image
    ///
    /// The staged file is dropped, and with it removed from local storage,
    /// before this returns.
    ///
    /// # Errors
    ///
    /// Returns `ImageStorageError::InvalidInput` if no file was supplied, without
    /// touching the store
    /// Returns `ImageStorageError::StoreWrite` if the store rejects the upload
    #[instrument(skip(self, upload))]
    pub async fn submit_upload(
        &self,
        upload: Option<StagedUpload>,
    ) -> ImageStorageResult<StoredImage> {
        let Some(upload) = upload else {
            warn!("Upload submitted without an image");
            return Err(ImageStorageError::InvalidInput(
                NO_IMAGE_MESSAGE.to_string(),
            ));
        };

        let image = self.store.upload(&upload).await?;
        info!("Stored image {}", image.key);

        Ok(image)
    }

    /// Removes an image by its full key
    ///
    /// Removing an image that is already gone succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ImageStorageError::InvalidInput` if `key` is outside the
    /// `uploads/` prefix
    /// Returns `ImageStorageError::StoreWrite` on a store failure
    #[instrument(skip(self))]
    pub async fn remove_image(&self, key: &str) -> ImageStorageResult<()> {
        if !key.starts_with(UPLOADS_PREFIX) || key.len() == UPLOADS_PREFIX.len() {
            warn!("Refusing to delete key outside the gallery: {key}");
            return Err(ImageStorageError::InvalidInput(format!(
                "not a gallery key: {key}"
            )));
        }

        self.store.delete(key).await
    }
}
