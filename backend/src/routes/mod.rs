mod docs;
mod gallery;
mod health;
/// Staging of multipart uploads
pub mod multipart;
/// Versioned JSON API
pub mod v1;

use aide::axum::{routing::get, ApiRouter};
use axum::routing;

use crate::types::Environment;

pub use gallery::DELETE_FAILED_CODE;

/// Creates the router with the HTML gallery, health check, docs and JSON API
pub fn handler(environment: Environment) -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler(environment))
        .route("/", routing::get(gallery::index))
        .route("/upload", routing::post(gallery::upload))
        // Keys contain `/`, so the whole remaining path is the key
        .route("/delete/{*key}", routing::post(gallery::delete))
        .api_route("/health", get(health::handler))
        .merge(v1::handler())
}
