//! # Persistence Layer
//!
//! Repository contracts and the in-memory reference engine.
//!
//! ## Repository Traits (Ports)
//!
//! - [`StrategyRepository`], [`OrderRepository`], [`TradeRepository`],
//!   [`PositionRepository`]: trading records
//! - [`ServiceDiscoveryRepository`]: service registry
//! - [`CacheRepository`]: key/value cache, with typed helpers in
//!   [`CacheRepositoryExt`]
//!
//! ## Implementations
//!
//! - `in_memory`: reference engine backing every trait

pub mod in_memory;
pub mod traits;

pub use traits::{
    CacheRepository, CacheRepositoryExt, OrderRepository, PositionRepository, RepositoryError,
    RepositoryResult, ServiceDiscoveryRepository, StrategyRepository, TradeRepository,
};
