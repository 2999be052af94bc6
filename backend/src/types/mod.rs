mod environment;
mod error;

pub use environment::{AppConfig, ConfigError, Environment, StoreConfig};
pub use error::{ApiErrorResponse, AppError};
