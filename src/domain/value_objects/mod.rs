//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`StrategyId`], [`OrderId`], [`TradeId`], [`PositionId`], [`ServiceId`]:
//!   string-backed identifiers
//!
//! ## Numeric Types
//!
//! Money and quantities are plain [`rust_decimal::Decimal`]. The
//! [`arithmetic`] module provides overflow-checked operations.
//!
//! ## Domain Enums
//!
//! - `StrategyStatus`, `StrategyType`
//! - `OrderSide`, `OrderType`, `OrderStatus`, `TimeInForce`

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod pagination;
pub mod timestamp;

pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic, checked_sum};
pub use enums::{
    OrderSide, OrderStatus, OrderType, ParseEnumError, StrategyStatus, StrategyType, TimeInForce,
};
pub use ids::{OrderId, PositionId, ServiceId, StrategyId, TradeId};
pub use pagination::{Pagination, SortOrder};
pub use timestamp::Timestamp;
