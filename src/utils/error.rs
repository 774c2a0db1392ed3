//! The `error` module defines the error types used within `pubreg`.
//!
//! The registry operations themselves are infallible; only configuration
//! loading can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}
