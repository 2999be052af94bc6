use std::{net::SocketAddr, sync::Arc};

use aide::openapi::OpenApi;
use axum::{extract::DefaultBodyLimit, Extension, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    gallery::GalleryService,
    routes,
    types::{AppConfig, Environment},
};

/// Builds the application router with its dependencies attached
#[must_use]
pub fn router(
    environment: Environment,
    gallery: Arc<GalleryService>,
    max_upload_bytes: usize,
) -> Router {
    let mut openapi = OpenApi::default();
    openapi.info.title = "Image Gallery".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();

    routes::handler(environment)
        .finish_api(&mut openapi)
        .layer(Extension(Arc::new(openapi)))
        .layer(Extension(environment))
        .layer(Extension(gallery))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Starts the server with the given configuration and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(config: AppConfig, gallery: Arc<GalleryService>) -> anyhow::Result<()> {
    let router = router(config.environment, gallery, config.max_upload_bytes)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = TcpListener::bind(&addr).await?;
    info!("🔄 Image Gallery started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutting down Image Gallery...");
}
