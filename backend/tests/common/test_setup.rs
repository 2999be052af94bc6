use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use gallery_backend::{gallery::GalleryService, server, types::Environment};
use tower::ServiceExt;

use super::{multipart_body, MemoryImageStore, MULTIPART_BOUNDARY};

/// Body limit used by the test router
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Initialize tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Router wired to an in-memory image store
pub struct TestSetup {
    pub router: Router,
    pub store: Arc<MemoryImageStore>,
    pub gallery: Arc<GalleryService>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_page_size(6)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self::with_environment(Environment::Development, page_size)
    }

    pub fn with_environment(environment: Environment, page_size: usize) -> Self {
        setup_test_env();

        let store = Arc::new(MemoryImageStore::new());
        let gallery = Arc::new(GalleryService::new(store.clone(), page_size));
        let router = server::router(environment, gallery.clone(), TEST_MAX_UPLOAD_BYTES);

        Self {
            router,
            store,
            gallery,
        }
    }

    pub async fn send_get_request(&self, route: &str) -> Response {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn send_post_request(&self, route: &str) -> Response {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .body(Body::empty())
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Posts a multipart form with a single `field`
    pub async fn send_multipart_request(
        &self,
        route: &str,
        field: &str,
        file_name: Option<&str>,
        content_type: &str,
        data: &[u8],
    ) -> Response {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(multipart_body(
                field,
                file_name,
                content_type,
                data,
            )))
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Uploads `data` as the `image` field of the HTML form
    pub async fn upload_image(&self, file_name: &str, content_type: &str, data: &[u8]) -> Response {
        self.send_multipart_request("/upload", "image", Some(file_name), content_type, data)
            .await
    }
}
