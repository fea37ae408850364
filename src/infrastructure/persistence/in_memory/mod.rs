//! # In-Memory Repositories
//!
//! Reference implementations of every repository trait, used for tests
//! and for degraded operation when no backing store is reachable.
//!
//! ## Available Repositories
//!
//! - [`InMemoryStrategyRepository`]: strategy persistence
//! - [`InMemoryOrderRepository`]: order persistence
//! - [`InMemoryTradeRepository`]: append-only trade log with aggregates
//! - [`InMemoryPositionRepository`]: positions with mark-to-market
//! - [`InMemoryServiceDiscoveryRepository`]: service registry
//! - [`InMemoryCacheRepository`]: TTL cache with glob key matching
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<HashMap>>` for thread-safe access.
//! Each operation holds the lock for its whole duration, so single calls
//! are atomic; sequences of calls are not.

pub mod cache_repository;
pub mod order_repository;
pub mod pattern;
pub mod position_repository;
pub mod service_discovery_repository;
pub mod strategy_repository;
pub mod trade_repository;

pub use cache_repository::InMemoryCacheRepository;
pub use order_repository::InMemoryOrderRepository;
pub use position_repository::InMemoryPositionRepository;
pub use service_discovery_repository::InMemoryServiceDiscoveryRepository;
pub use strategy_repository::InMemoryStrategyRepository;
pub use trade_repository::InMemoryTradeRepository;
