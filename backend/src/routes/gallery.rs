use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{PathRejection, QueryRejection},
        Multipart, Path, Query,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use serde::Deserialize;
use tracing::{error, instrument, warn};

use super::multipart::stage_image;
use crate::{
    gallery::{
        GalleryPage, GalleryService, PageNumber, DELETE_FAILED_MESSAGE, NO_IMAGE_MESSAGE,
        UPLOAD_FAILED_MESSAGE,
    },
    image_storage::ImageStorageError,
    views,
};

/// Error code carried by the redirect after a failed delete
pub const DELETE_FAILED_CODE: &str = "delete_failed";

/// Query string of the gallery page
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    page: Option<String>,
    error: Option<String>,
}

/// Renders one page of the gallery
///
/// Always answers `200`: malformed query strings fall back to the first page
/// and store failures render an empty, error-flagged page.
#[instrument(skip_all)]
pub async fn index(
    Extension(gallery): Extension<Arc<GalleryService>>,
    query: Result<Query<GalleryQuery>, QueryRejection>,
) -> Html<String> {
    let query = query.map(|Query(query)| query).unwrap_or_default();

    let mut page = gallery
        .get_page(PageNumber::parse(query.page.as_deref()))
        .await;

    if page.error.is_none() && query.error.as_deref() == Some(DELETE_FAILED_CODE) {
        page.error = Some(DELETE_FAILED_MESSAGE.to_string());
    }

    Html(views::render_gallery(&page))
}

/// Accepts an image from the upload form
///
/// Redirects to the gallery on success. Otherwise renders the gallery in a
/// degraded state.
#[instrument(skip_all)]
pub async fn upload(
    Extension(gallery): Extension<Arc<GalleryService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let staged = match multipart {
        Ok(multipart) => match stage_image(multipart).await {
            Ok(staged) => staged,
            Err(e) => {
                warn!("Error reading upload: {e}");
                return degraded(status_for(&e), UPLOAD_FAILED_MESSAGE);
            }
        },
        Err(rejection) => {
            warn!("Upload is not a multipart form: {rejection}");
            None
        }
    };

    match gallery.submit_upload(staged).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(ImageStorageError::InvalidInput(_)) => {
            degraded(StatusCode::BAD_REQUEST, NO_IMAGE_MESSAGE)
        }
        Err(e) => {
            error!("Error uploading image: {e}");
            degraded(status_for(&e), UPLOAD_FAILED_MESSAGE)
        }
    }
}

/// Deletes an image by its full key and returns to the gallery
///
/// Missing objects and undecodable keys count as deleted. A store failure
/// adds an error indicator to the redirect.
#[instrument(skip_all)]
pub async fn delete(
    Extension(gallery): Extension<Arc<GalleryService>>,
    key: Result<Path<String>, PathRejection>,
) -> Redirect {
    let key = match key {
        Ok(Path(key)) => key,
        Err(rejection) => {
            warn!("Unusable delete key: {rejection}");
            return Redirect::to("/");
        }
    };

    match gallery.remove_image(&key).await {
        Ok(()) | Err(ImageStorageError::InvalidInput(_)) => Redirect::to("/"),
        Err(e) => {
            error!("Error deleting image: {e}");
            Redirect::to(&format!("/?error={DELETE_FAILED_CODE}"))
        }
    }
}

fn degraded(status: StatusCode, message: &str) -> Response {
    let page = GalleryPage::degraded(message);
    (status, Html(views::render_gallery(&page))).into_response()
}

// The HTML surface never answers 500; local failures read as unavailable
const fn status_for(error: &ImageStorageError) -> StatusCode {
    match error {
        ImageStorageError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}
