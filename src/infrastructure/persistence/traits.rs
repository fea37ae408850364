//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! Each trait is the complete contract a storage backend must honour to be
//! substitutable: relational, document, remote cache or the in-memory
//! reference engine in [`super::in_memory`].
//!
//! # Contract
//!
//! - A read that finds nothing returns `Ok(None)` (or an empty list),
//!   never [`RepositoryError::NotFound`].
//! - A mutation that targets a missing ID is a silent no-op returning `Ok(())`.
//! - `Err` is reserved for backend failures, undecodable stored values and
//!   decimal overflow during aggregation.
//!
//! # Available Repositories
//!
//! - [`StrategyRepository`]: strategies and their running P&L
//! - [`OrderRepository`]: order lifecycle
//! - [`TradeRepository`]: append-only executions and aggregates
//! - [`PositionRepository`]: positions, mark-to-market and exposure
//! - [`ServiceDiscoveryRepository`]: service registry with heartbeats
//! - [`CacheRepository`]: string key/value cache with TTLs and glob patterns
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::infrastructure::persistence::traits::{
//!     OrderRepository, RepositoryResult,
//! };
//!
//! async fn open_order_count(repo: &dyn OrderRepository) -> RepositoryResult<usize> {
//!     Ok(repo.get_active_orders(None).await?.len())
//! }
//! ```

use crate::domain::entities::{Order, Position, ServiceInfo, Strategy, Trade};
use crate::domain::queries::{OrderQuery, PositionQuery, StrategyQuery, TradeQuery};
use crate::domain::value_objects::{
    ArithmeticError, OrderId, OrderStatus, PositionId, ServiceId, StrategyId, StrategyStatus,
    StrategyType, Timestamp, TradeId,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found where one was required.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Decimal overflow while aggregating.
    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a connection error.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns true if this is a serialization error.
    #[must_use]
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for strategies.
#[async_trait]
pub trait StrategyRepository: Send + Sync + fmt::Debug {
    /// Stores a new strategy, replacing any strategy with the same ID.
    async fn create(&self, strategy: &Strategy) -> RepositoryResult<()>;

    /// Gets a strategy by ID.
    ///
    /// Returns `None` if the strategy does not exist.
    async fn get_by_id(&self, id: &StrategyId) -> RepositoryResult<Option<Strategy>>;

    /// Replaces a stored strategy. Ignored if the ID is unknown.
    async fn update(&self, strategy: &Strategy) -> RepositoryResult<()>;

    /// Deletes a strategy. Ignored if the ID is unknown.
    async fn delete(&self, id: &StrategyId) -> RepositoryResult<()>;

    /// Returns strategies matching `query`.
    async fn query(&self, query: &StrategyQuery) -> RepositoryResult<Vec<Strategy>>;

    /// Returns strategies with status `Active`.
    async fn get_active_strategies(&self) -> RepositoryResult<Vec<Strategy>>;

    /// Sets the status, stamping start/stop times.
    async fn update_status(&self, id: &StrategyId, status: StrategyStatus) -> RepositoryResult<()>;

    /// Overwrites total and daily P&L.
    async fn update_pnl(
        &self,
        id: &StrategyId,
        total_pnl: Decimal,
        daily_pnl: Decimal,
    ) -> RepositoryResult<()>;

    /// Adds one to the trade counter.
    async fn increment_trade_count(&self, id: &StrategyId) -> RepositoryResult<()>;

    /// Returns strategies trading `instrument_id`.
    async fn get_by_instrument(&self, instrument_id: &str) -> RepositoryResult<Vec<Strategy>>;

    /// Returns strategies of one classification.
    async fn get_by_type(&self, strategy_type: StrategyType) -> RepositoryResult<Vec<Strategy>>;

    /// Returns the number of stored strategies.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync + fmt::Debug {
    /// Stores a new order, replacing any order with the same ID.
    async fn create(&self, order: &Order) -> RepositoryResult<()>;

    /// Gets an order by ID.
    async fn get_by_id(&self, id: &OrderId) -> RepositoryResult<Option<Order>>;

    /// Replaces a stored order. Ignored if the ID is unknown.
    async fn update(&self, order: &Order) -> RepositoryResult<()>;

    /// Deletes an order. Ignored if the ID is unknown.
    async fn delete(&self, id: &OrderId) -> RepositoryResult<()>;

    /// Returns orders matching `query`.
    async fn query(&self, query: &OrderQuery) -> RepositoryResult<Vec<Order>>;

    /// Returns all orders of a strategy.
    async fn get_by_strategy(&self, strategy_id: &StrategyId) -> RepositoryResult<Vec<Order>>;

    /// Returns orders that may still execute, optionally for one strategy.
    ///
    /// Active statuses are `pending`, `submitted`, `accepted` and
    /// `partially_filled`.
    async fn get_active_orders(
        &self,
        strategy_id: Option<&StrategyId>,
    ) -> RepositoryResult<Vec<Order>>;

    /// Sets the status and, when given, the filled quantity.
    async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        filled_quantity: Option<Decimal>,
    ) -> RepositoryResult<()>;

    /// Records the filled quantity and average fill price.
    ///
    /// `remaining_quantity` is not recomputed.
    async fn update_fill(
        &self,
        id: &OrderId,
        filled_quantity: Decimal,
        average_price: Decimal,
    ) -> RepositoryResult<()>;

    /// Marks an order cancelled at `cancelled_at`, whatever its status.
    async fn cancel_order(&self, id: &OrderId, cancelled_at: Timestamp) -> RepositoryResult<()>;

    /// Finds an order by the exchange-assigned ID.
    async fn get_by_exchange_order_id(
        &self,
        exchange_order_id: &str,
    ) -> RepositoryResult<Option<Order>>;

    /// Returns orders for an instrument, optionally with one status.
    async fn get_orders_by_instrument(
        &self,
        instrument_id: &str,
        status: Option<OrderStatus>,
    ) -> RepositoryResult<Vec<Order>>;

    /// Returns orders with status `pending`.
    async fn get_pending_orders(&self) -> RepositoryResult<Vec<Order>>;
}

/// Repository for trades.
///
/// Trades are append-only: there is no update operation.
#[async_trait]
pub trait TradeRepository: Send + Sync + fmt::Debug {
    /// Appends a trade.
    async fn create(&self, trade: &Trade) -> RepositoryResult<()>;

    /// Gets a trade by ID.
    async fn get_by_id(&self, id: &TradeId) -> RepositoryResult<Option<Trade>>;

    /// Deletes a trade. Ignored if the ID is unknown.
    async fn delete(&self, id: &TradeId) -> RepositoryResult<()>;

    /// Returns trades matching `query`.
    async fn query(&self, query: &TradeQuery) -> RepositoryResult<Vec<Trade>>;

    /// Returns the fills of one order.
    async fn get_by_order(&self, order_id: &OrderId) -> RepositoryResult<Vec<Trade>>;

    /// Returns a strategy's trades executed within `[from, to]`.
    async fn get_by_strategy(
        &self,
        strategy_id: &StrategyId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> RepositoryResult<Vec<Trade>>;

    /// Returns an instrument's trades executed within `[from, to]`.
    async fn get_by_instrument(
        &self,
        instrument_id: &str,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> RepositoryResult<Vec<Trade>>;

    /// Returns a strategy's trades executed on a UTC calendar day.
    async fn get_daily_trades(
        &self,
        strategy_id: &StrategyId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Trade>>;

    /// Sums `gross_value` over a strategy's trades within `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Arithmetic` on overflow.
    async fn calculate_total_volume(
        &self,
        strategy_id: &StrategyId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> RepositoryResult<Decimal>;

    /// Sums `realized_pnl` (missing counts as zero) within `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Arithmetic` on overflow.
    async fn calculate_total_pnl(
        &self,
        strategy_id: &StrategyId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> RepositoryResult<Decimal>;

    /// Finds a trade by the exchange-assigned ID.
    async fn get_by_exchange_trade_id(
        &self,
        exchange_trade_id: &str,
    ) -> RepositoryResult<Option<Trade>>;

    /// Returns up to `limit` trades, newest first.
    async fn get_recent_trades(&self, limit: usize) -> RepositoryResult<Vec<Trade>>;
}

/// Repository for positions.
#[async_trait]
pub trait PositionRepository: Send + Sync + fmt::Debug {
    /// Stores a new position, replacing any position with the same ID.
    async fn create(&self, position: &Position) -> RepositoryResult<()>;

    /// Gets a position by ID.
    async fn get_by_id(&self, id: &PositionId) -> RepositoryResult<Option<Position>>;

    /// Replaces a stored position. Ignored if the ID is unknown.
    async fn update(&self, position: &Position) -> RepositoryResult<()>;

    /// Deletes a position. Ignored if the ID is unknown.
    async fn delete(&self, id: &PositionId) -> RepositoryResult<()>;

    /// Returns positions matching `query`.
    async fn query(&self, query: &PositionQuery) -> RepositoryResult<Vec<Position>>;

    /// Returns all positions of a strategy.
    async fn get_by_strategy(&self, strategy_id: &StrategyId) -> RepositoryResult<Vec<Position>>;

    /// Returns open positions, optionally for one strategy.
    async fn get_open_positions(
        &self,
        strategy_id: Option<&StrategyId>,
    ) -> RepositoryResult<Vec<Position>>;

    /// Returns a strategy's open position in an instrument.
    async fn get_by_instrument(
        &self,
        strategy_id: &StrategyId,
        instrument_id: &str,
    ) -> RepositoryResult<Option<Position>>;

    /// Marks a position to `current_price`, recomputing every derived field.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Arithmetic` on overflow; the stored
    /// position is then left unchanged.
    async fn update_market_data(
        &self,
        id: &PositionId,
        current_price: Decimal,
    ) -> RepositoryResult<()>;

    /// Marks a position closed at `closed_at`.
    async fn close_position(&self, id: &PositionId, closed_at: Timestamp) -> RepositoryResult<()>;

    /// Sums exposure over open positions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Arithmetic` on overflow.
    async fn calculate_total_exposure(
        &self,
        strategy_id: Option<&StrategyId>,
    ) -> RepositoryResult<Decimal>;

    /// Sums unrealized P&L over open positions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Arithmetic` on overflow.
    async fn calculate_total_unrealized_pnl(
        &self,
        strategy_id: Option<&StrategyId>,
    ) -> RepositoryResult<Decimal>;

    /// Returns up to `limit` positions with the largest exposure.
    async fn get_largest_positions(&self, limit: usize) -> RepositoryResult<Vec<Position>>;
}

/// Registry of running service instances.
#[async_trait]
pub trait ServiceDiscoveryRepository: Send + Sync + fmt::Debug {
    /// Registers a service, replacing any entry with the same ID.
    async fn register(&self, service: &ServiceInfo) -> RepositoryResult<()>;

    /// Removes a service. Ignored if the ID is unknown.
    async fn deregister(&self, id: &ServiceId) -> RepositoryResult<()>;

    /// Refreshes `last_seen` to now.
    async fn update_heartbeat(&self, id: &ServiceId) -> RepositoryResult<()>;

    /// Returns one instance registered under `service_name`.
    ///
    /// Names are not unique; implementations pick one deterministically.
    async fn get_service(&self, service_name: &str) -> RepositoryResult<Option<ServiceInfo>>;

    /// Gets a service by ID.
    async fn get_service_by_id(&self, id: &ServiceId) -> RepositoryResult<Option<ServiceInfo>>;

    /// Returns every registration.
    async fn list_services(&self) -> RepositoryResult<Vec<ServiceInfo>>;

    /// Returns registrations whose status is exactly `"healthy"`.
    async fn list_healthy_services(&self) -> RepositoryResult<Vec<ServiceInfo>>;

    /// Removes services not seen for more than `threshold_secs`.
    ///
    /// Returns the number removed.
    async fn cleanup_stale_services(&self, threshold_secs: u64) -> RepositoryResult<u64>;

    /// Replaces the status string.
    async fn update_status(&self, id: &ServiceId, status: &str) -> RepositoryResult<()>;
}

/// String key/value cache with optional per-key expiry.
///
/// TTLs are whole seconds; `None` or `Some(0)` means no expiry.
#[async_trait]
pub trait CacheRepository: Send + Sync + fmt::Debug {
    /// Returns the live value for `key`.
    async fn get(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// Stores `value`, replacing any previous value and expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> RepositoryResult<()>;

    /// Removes `key`.
    async fn delete(&self, key: &str) -> RepositoryResult<()>;

    /// Returns true if `key` holds a live value.
    async fn exists(&self, key: &str) -> RepositoryResult<bool>;

    /// Returns the value for `key` decoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Serialization` if the stored value is not JSON.
    async fn get_json(&self, key: &str) -> RepositoryResult<Option<serde_json::Value>>;

    /// Stores `value` encoded as JSON.
    async fn set_json(
        &self,
        key: &str,
        value: &serde_json::Value,
        ttl: Option<u64>,
    ) -> RepositoryResult<()>;

    /// Returns the value of each key, in order.
    async fn get_many(&self, keys: &[String]) -> RepositoryResult<Vec<Option<String>>>;

    /// Stores every pair with the same TTL. Not atomic across keys.
    async fn set_many(
        &self,
        items: &HashMap<String, String>,
        ttl: Option<u64>,
    ) -> RepositoryResult<()>;

    /// Removes keys matching a shell glob (`*`, `?`, `[...]`).
    ///
    /// Returns the number of keys removed.
    async fn delete_pattern(&self, pattern: &str) -> RepositoryResult<u64>;

    /// Returns keys matching a shell glob.
    async fn keys(&self, pattern: &str) -> RepositoryResult<Vec<String>>;

    /// Remaining lifetime of `key` in whole seconds.
    ///
    /// Returns `-2` if the key is absent or expired and `-1` if it never expires.
    async fn ttl(&self, key: &str) -> RepositoryResult<i64>;

    /// Sets a new expiry on a live key. Ignored if the key is absent.
    async fn expire(&self, key: &str, ttl: u64) -> RepositoryResult<()>;

    /// Adds `amount` to an integer value (missing counts as zero).
    ///
    /// The result is stored without expiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Serialization` if the stored value is not an
    /// integer, or `RepositoryError::Arithmetic` on overflow.
    async fn increment(&self, key: &str, amount: i64) -> RepositoryResult<i64>;

    /// Subtracts `amount`; see [`CacheRepository::increment`].
    async fn decrement(&self, key: &str, amount: i64) -> RepositoryResult<i64>;
}

/// Typed JSON helpers available on every [`CacheRepository`].
///
/// # Examples
///
/// ```
/// use trading_data_adapter::infrastructure::persistence::in_memory::InMemoryCacheRepository;
/// use trading_data_adapter::infrastructure::persistence::traits::CacheRepositoryExt;
///
/// # tokio_test::block_on(async {
/// let cache = InMemoryCacheRepository::new();
/// cache.set_as("limits", &vec![1, 2, 3], None).await.unwrap();
/// let back: Option<Vec<i32>> = cache.get_as("limits").await.unwrap();
/// assert_eq!(back, Some(vec![1, 2, 3]));
/// # });
/// ```
#[async_trait]
pub trait CacheRepositoryExt: CacheRepository {
    /// Reads `key` and deserializes it into `T`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Serialization` if decoding fails.
    async fn get_as<T>(&self, key: &str) -> RepositoryResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get_json(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` and stores it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Serialization` if encoding fails.
    async fn set_as<T>(&self, key: &str, value: &T, ttl: Option<u64>) -> RepositoryResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let json = serde_json::to_value(value)?;
        self.set_json(key, &json, ttl).await
    }
}

impl<C: CacheRepository + ?Sized> CacheRepositoryExt for C {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = RepositoryError::not_found("Order", "ord-1");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: Order with id ord-1");
    }

    #[test]
    fn arithmetic_converts() {
        let err: RepositoryError = ArithmeticError::Overflow.into();
        assert!(matches!(err, RepositoryError::Arithmetic(_)));
    }

    #[test]
    fn json_errors_are_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").err();
        let err = json_err.map(RepositoryError::from);
        assert!(err.is_some_and(|e| e.is_serialization()));
    }

    #[test]
    fn traits_are_object_safe() {
        fn assert_dyn(_: Option<&dyn CacheRepository>, _: Option<&dyn PositionRepository>) {}
        assert_dyn(None, None);
    }
}
