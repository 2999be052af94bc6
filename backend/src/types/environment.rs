//! Environment configuration for different deployment stages

use std::{env, fmt, time::Duration};

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use thiserror::Error;

use crate::{gallery::DEFAULT_PAGE_SIZE, image_storage::ObjectUrlBuilder};

const LOCALSTACK_ENDPOINT_URL: &str = "http://localhost:4566";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
/// 15 MiB
const DEFAULT_MAX_UPLOAD_BYTES: usize = 15_728_640;

/// Errors raised while reading configuration at startup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank
    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),

    /// A variable is set to something unusable
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Parses an `APP_ENV` value, defaulting to development
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unknown environments
    pub fn parse(value: Option<&str>) -> Result<Self, ConfigError> {
        let env = value.unwrap_or("development").trim().to_lowercase();

        match env.as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(ConfigError::InvalidValue {
                name: "APP_ENV",
                value: env,
            }),
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Whether logs are emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Endpoint URL used when `AWS_ENDPOINT_URL` isn't set
    #[must_use]
    pub const fn default_aws_endpoint_url(&self) -> Option<&'static str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some(LOCALSTACK_ENDPOINT_URL),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Staging => write!(f, "staging"),
            Self::Development => write!(f, "development"),
        }
    }
}

/// Object store access configuration
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Store region, e.g. `us-east-1`
    pub region: String,
    /// Bucket holding the gallery
    pub bucket_name: String,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}

/// Complete application configuration, validated at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Deployment stage
    pub environment: Environment,
    /// Object store access
    pub store: StoreConfig,
    /// Custom store endpoint (`LocalStack` or another S3-compatible service)
    pub endpoint_url: Option<String>,
    /// Listen port
    pub port: u16,
    /// Images per gallery page
    pub page_size: usize,
    /// Upper bound for every object store call
    pub store_timeout: Duration,
    /// Upper bound for a whole HTTP request
    pub request_timeout: Duration,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Reads the configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value is invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let environment = Environment::parse(lookup("APP_ENV").as_deref())?;

        let store = StoreConfig {
            access_key_id: required("AWS_ACCESS_KEY_ID")?,
            secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            region: required("AWS_REGION")?,
            bucket_name: required("AWS_BUCKET_NAME")?,
        };

        let endpoint_url = lookup("AWS_ENDPOINT_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .or_else(|| environment.default_aws_endpoint_url().map(String::from));

        let page_size = parse_or(&lookup, "GALLERY_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "GALLERY_PAGE_SIZE",
                value: page_size.to_string(),
            });
        }

        Ok(Self {
            environment,
            store,
            endpoint_url,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            page_size,
            store_timeout: Duration::from_secs(parse_or(
                &lookup,
                "STORE_TIMEOUT_SECS",
                DEFAULT_STORE_TIMEOUT_SECS,
            )?),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }

    /// AWS configuration with credentials, retry and timeout settings
    ///
    /// Retries only apply to idempotent calls; uploads opt out per request.
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(self.store_timeout)
            .build();

        let credentials = Credentials::new(
            &self.store.access_key_id,
            &self.store.secret_access_key,
            None,
            None,
            "gallery-environment",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.store.region.clone()))
            .credentials_provider(credentials)
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Custom endpoints (LocalStack, MinIO) don't serve virtual-hosted buckets
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if self.endpoint_url.is_some() {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Builder for the public URL of stored objects
    #[must_use]
    pub fn object_urls(&self) -> ObjectUrlBuilder {
        match &self.endpoint_url {
            Some(endpoint_url) => {
                ObjectUrlBuilder::path_style(endpoint_url, &self.store.bucket_name)
            }
            None => {
                ObjectUrlBuilder::virtual_hosted(&self.store.bucket_name, &self.store.region)
            }
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
