//! # Application Layer
//!
//! The [`TradingDataAdapter`] facade, its health reporting and its errors.

pub mod adapter;
pub mod error;
pub mod health;

pub use adapter::{BackendProbe, TradingDataAdapter, TradingDataAdapterBuilder, create_adapter};
pub use error::{AdapterError, AdapterResult};
pub use health::{BackendConnection, BackendHealth, ConnectionStatus, HealthReport, HealthStatus};
