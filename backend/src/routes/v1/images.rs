use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Multipart, Query},
    http::StatusCode,
    Extension, Json,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    gallery::{GalleryPage, GalleryService, PageNumber},
    image_storage::StoredImage,
    routes::multipart::stage_image,
    types::AppError,
};

/// Query string of the listing endpoint
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListImagesQuery {
    /// 1-based page number; missing or invalid values select the first page
    pub page: Option<String>,
}

/// Lists one page of the gallery
///
/// Store failures don't fail the request: the page comes back empty with
/// `error` set.
#[instrument(skip(gallery))]
pub async fn list_images(
    Extension(gallery): Extension<Arc<GalleryService>>,
    query: Result<Query<ListImagesQuery>, QueryRejection>,
) -> Json<GalleryPage> {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let page = PageNumber::parse(query.page.as_deref());
    Json(gallery.get_page(page).await)
}

/// Uploads an image sent as the `image` field of a multipart form
///
/// # Errors
///
/// - `400 invalid_input` - No file attached or the body is malformed
/// - `503 store_unavailable` - The object store rejected the upload
/// - `500 internal_error` - The upload could not be staged locally
#[instrument(skip_all)]
pub async fn upload_image(
    Extension(gallery): Extension<Arc<GalleryService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StoredImage>), AppError> {
    let staged = stage_image(multipart).await?;
    let image = gallery.submit_upload(staged).await?;

    Ok((StatusCode::CREATED, Json(image)))
}
