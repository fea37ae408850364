//! # Trading Data Adapter
//!
//! Storage-agnostic persistence contracts for a trading platform, with an
//! in-memory reference engine behind every contract.
//!
//! ## Layers
//!
//! - [`domain`]: strategies, orders, trades, positions, service
//!   registrations and the value objects they are built from
//! - [`infrastructure`]: the six async repository traits, the in-memory
//!   engine implementing them, and tracing setup
//! - [`config`]: layered settings and schema/namespace derivation
//! - [`application`]: the [`TradingDataAdapter`] facade with health checks
//!
//! ## Quick Start
//!
//! ```
//! use trading_data_adapter::prelude::*;
//! use rust_decimal::Decimal;
//!
//! # tokio_test::block_on(async {
//! let adapter = create_adapter(AdapterConfig::default()).await.unwrap();
//!
//! let order = Order::new(
//!     OrderId::new("ord-1"),
//!     StrategyId::new("strat-1"),
//!     "BTC-USD",
//!     OrderSide::Buy,
//!     OrderType::Limit,
//!     Decimal::ONE,
//! )
//! .unwrap();
//! adapter.orders().create(&order).await.unwrap();
//!
//! let active = adapter.orders().get_active_orders(None).await.unwrap();
//! assert_eq!(active.len(), 1);
//! # });
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{AdapterError, AdapterResult, TradingDataAdapter, create_adapter};
pub use config::AdapterConfig;

/// Common imports for adapter users.
pub mod prelude {
    pub use crate::application::{
        AdapterError, AdapterResult, BackendProbe, HealthReport, HealthStatus, TradingDataAdapter,
        create_adapter,
    };
    pub use crate::config::{AdapterConfig, StorageNames};
    pub use crate::domain::entities::{Order, Position, RiskLimits, ServiceInfo, Strategy, Trade};
    pub use crate::domain::queries::{OrderQuery, PositionQuery, StrategyQuery, TradeQuery};
    pub use crate::domain::value_objects::{
        OrderId, OrderSide, OrderStatus, OrderType, Pagination, PositionId, ServiceId, SortOrder,
        StrategyId, StrategyStatus, StrategyType, TimeInForce, Timestamp, TradeId,
    };
    pub use crate::domain::{DomainError, DomainResult};
    pub use crate::infrastructure::persistence::{
        CacheRepository, CacheRepositoryExt, OrderRepository, PositionRepository,
        RepositoryError, RepositoryResult, ServiceDiscoveryRepository, StrategyRepository,
        TradeRepository,
    };
}
