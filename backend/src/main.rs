use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use gallery_backend::{
    gallery::GalleryService,
    image_storage::S3ImageStore,
    server,
    types::AppConfig,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; variables may come from the process environment
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // JSON logs for staging/production, human readable logs for development
    if config.environment.json_logs() {
        fmt().json().with_env_filter(env_filter).init();
    } else {
        fmt().with_env_filter(env_filter).init();
    }

    info!(
        "Starting Image Gallery in {} environment with bucket {}",
        config.environment, config.store.bucket_name
    );

    let s3_client = Arc::new(S3Client::from_conf(config.s3_client_config().await));
    let image_store = Arc::new(S3ImageStore::new(
        s3_client,
        config.store.bucket_name.clone(),
        config.object_urls(),
    ));
    let gallery = Arc::new(GalleryService::new(image_store, config.page_size));

    server::start(config, gallery).await
}
