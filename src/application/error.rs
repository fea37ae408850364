//! # Application Errors
//!
//! Error type surfaced by the [`TradingDataAdapter`](super::TradingDataAdapter)
//! facade.
//!
//! # Error Hierarchy
//!
//! ```text
//! AdapterError
//! ├── Configuration(String)      - invalid settings or logging setup
//! ├── Repository(RepositoryError) - storage failures
//! ├── Domain(DomainError)        - rejected records
//! └── Infrastructure { .. }      - backend connection failures
//! ```
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::application::error::AdapterError;
//!
//! let err = AdapterError::infrastructure("redis", "connection refused");
//! assert!(err.is_infrastructure());
//! assert_eq!(err.to_string(), "infrastructure error: redis - connection refused");
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::telemetry::TelemetryError;
use thiserror::Error;

/// Facade error.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Repository failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Domain validation failure.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Backend connection failure.
    #[error("infrastructure error: {backend} - {message}")]
    Infrastructure {
        /// Backend name.
        backend: String,
        /// Failure description.
        message: String,
    },
}

impl AdapterError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an infrastructure error.
    #[must_use]
    pub fn infrastructure(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Infrastructure {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Returns true for configuration errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true for backend failures.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Infrastructure { .. })
    }
}

impl From<config::ConfigError> for AdapterError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<TelemetryError> for AdapterError {
    fn from(err: TelemetryError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Result type for facade operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
