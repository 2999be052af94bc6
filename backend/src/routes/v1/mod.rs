/// Image listing and upload endpoints
pub mod images;

use aide::axum::{routing::get, ApiRouter};

/// Creates the v1 JSON API router
pub fn handler() -> ApiRouter {
    ApiRouter::new().api_route(
        "/v1/images",
        get(images::list_images).post(images::upload_image),
    )
}
