//! # Order Entity
//!
//! Lifecycle record of an order from creation to a terminal state.
//!
//! `remaining_quantity` is supplied by the caller and is *not* recomputed
//! when fills are recorded; keeping it equal to
//! `quantity - filled_quantity` is the caller's job.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::domain::entities::Order;
//! use trading_data_adapter::domain::value_objects::{OrderId, OrderSide, OrderStatus, OrderType, StrategyId};
//! use rust_decimal::Decimal;
//!
//! let order = Order::new(
//!     OrderId::new("order_001"),
//!     StrategyId::new("strat_001"),
//!     "BTC-USD",
//!     OrderSide::Buy,
//!     OrderType::Limit,
//!     Decimal::new(15, 1),
//! )
//! .unwrap()
//! .with_price(Decimal::new(50000, 0));
//!
//! assert_eq!(order.status(), OrderStatus::Pending);
//! assert_eq!(order.remaining_quantity(), Decimal::new(15, 1));
//! assert_eq!(order.filled_quantity(), Decimal::ZERO);
//! ```

use crate::domain::errors::{DomainError, DomainResult, require_non_empty};
use crate::domain::value_objects::{
    CheckedArithmetic, OrderId, OrderSide, OrderStatus, OrderType, StrategyId, TimeInForce,
    Timestamp,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An order and its execution state.
///
/// # Invariants
///
/// - `quantity` is positive
/// - `filled_quantity <= quantity` when built through [`Order::with_fill`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    order_id: OrderId,
    strategy_id: StrategyId,
    instrument_id: String,
    side: OrderSide,
    order_type: OrderType,
    status: OrderStatus,
    time_in_force: TimeInForce,
    quantity: Decimal,
    filled_quantity: Decimal,
    remaining_quantity: Decimal,
    price: Option<Decimal>,
    stop_price: Option<Decimal>,
    average_fill_price: Option<Decimal>,
    exchange_order_id: Option<String>,
    execution_venue: Option<String>,
    commission: Decimal,
    realized_pnl: Option<Decimal>,
    created_at: Timestamp,
    submitted_at: Option<Timestamp>,
    filled_at: Option<Timestamp>,
    cancelled_at: Option<Timestamp>,
    updated_at: Timestamp,
    error_message: Option<String>,
}

impl Order {
    /// Creates a pending, unfilled order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` for blank identifiers and
    /// `DomainError::Validation` if `quantity` is not positive.
    pub fn new(
        order_id: OrderId,
        strategy_id: StrategyId,
        instrument_id: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        quantity: Decimal,
    ) -> DomainResult<Self> {
        let instrument_id = instrument_id.into();
        require_non_empty("Order", "order_id", order_id.as_str())?;
        require_non_empty("Order", "strategy_id", strategy_id.as_str())?;
        require_non_empty("Order", "instrument_id", &instrument_id)?;
        if quantity <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "order quantity must be positive, got {quantity}"
            )));
        }
        let now = Timestamp::now();
        Ok(Self {
            order_id,
            strategy_id,
            instrument_id,
            side,
            order_type,
            status: OrderStatus::Pending,
            time_in_force: TimeInForce::default(),
            quantity,
            filled_quantity: Decimal::ZERO,
            remaining_quantity: quantity,
            price: None,
            stop_price: None,
            average_fill_price: None,
            exchange_order_id: None,
            execution_venue: None,
            commission: Decimal::ZERO,
            realized_pnl: None,
            created_at: now,
            submitted_at: None,
            filled_at: None,
            cancelled_at: None,
            updated_at: now,
            error_message: None,
        })
    }

    /// Sets the status without stamping lifecycle times.
    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the limit price.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the stop price.
    #[must_use]
    pub fn with_stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    /// Sets the time-in-force.
    #[must_use]
    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    /// Sets the exchange-assigned order ID.
    #[must_use]
    pub fn with_exchange_order_id(mut self, id: impl Into<String>) -> Self {
        self.exchange_order_id = Some(id.into());
        self
    }

    /// Sets the execution venue.
    #[must_use]
    pub fn with_execution_venue(mut self, venue: impl Into<String>) -> Self {
        self.execution_venue = Some(venue.into());
        self
    }

    /// Sets the commission paid.
    #[must_use]
    pub fn with_commission(mut self, commission: Decimal) -> Self {
        self.commission = commission;
        self
    }

    /// Sets the realized P&L attributed to this order.
    #[must_use]
    pub fn with_realized_pnl(mut self, pnl: Decimal) -> Self {
        self.realized_pnl = Some(pnl);
        self
    }

    /// Records an error message (typically with a `Rejected` status).
    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Sets filled quantity and average price, deriving the remaining quantity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `filled` is negative or exceeds
    /// the order quantity.
    pub fn with_fill(mut self, filled: Decimal, average_price: Decimal) -> DomainResult<Self> {
        if filled < Decimal::ZERO || filled > self.quantity {
            return Err(DomainError::validation(format!(
                "filled quantity {filled} outside [0, {}]",
                self.quantity
            )));
        }
        self.remaining_quantity = self.quantity.safe_sub(filled)?;
        self.filled_quantity = filled;
        self.average_fill_price = Some(average_price);
        Ok(self)
    }

    /// Returns the order ID.
    #[inline]
    #[must_use]
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Returns the owning strategy.
    #[inline]
    #[must_use]
    pub fn strategy_id(&self) -> &StrategyId {
        &self.strategy_id
    }

    /// Returns the instrument.
    #[inline]
    #[must_use]
    pub fn instrument_id(&self) -> &str {
        &self.instrument_id
    }

    /// Returns the side.
    #[inline]
    #[must_use]
    pub fn side(&self) -> OrderSide {
        self.side
    }

    /// Returns the order type.
    #[inline]
    #[must_use]
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Returns the status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the time-in-force.
    #[inline]
    #[must_use]
    pub fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// Returns the ordered quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Returns the filled quantity.
    #[inline]
    #[must_use]
    pub fn filled_quantity(&self) -> Decimal {
        self.filled_quantity
    }

    /// Returns the remaining quantity.
    #[inline]
    #[must_use]
    pub fn remaining_quantity(&self) -> Decimal {
        self.remaining_quantity
    }

    /// Returns the limit price.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Returns the stop price.
    #[must_use]
    pub fn stop_price(&self) -> Option<Decimal> {
        self.stop_price
    }

    /// Returns the average fill price.
    #[must_use]
    pub fn average_fill_price(&self) -> Option<Decimal> {
        self.average_fill_price
    }

    /// Returns the exchange order ID.
    #[must_use]
    pub fn exchange_order_id(&self) -> Option<&str> {
        self.exchange_order_id.as_deref()
    }

    /// Returns the execution venue.
    #[must_use]
    pub fn execution_venue(&self) -> Option<&str> {
        self.execution_venue.as_deref()
    }

    /// Returns the commission paid.
    #[must_use]
    pub fn commission(&self) -> Decimal {
        self.commission
    }

    /// Returns the realized P&L.
    #[must_use]
    pub fn realized_pnl(&self) -> Option<Decimal> {
        self.realized_pnl
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the order was submitted.
    #[must_use]
    pub fn submitted_at(&self) -> Option<Timestamp> {
        self.submitted_at
    }

    /// When the order was fully filled.
    #[must_use]
    pub fn filled_at(&self) -> Option<Timestamp> {
        self.filled_at
    }

    /// When the order was cancelled.
    #[must_use]
    pub fn cancelled_at(&self) -> Option<Timestamp> {
        self.cancelled_at
    }

    /// Last modification time.
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the rejection message.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns true if the order may still execute.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Moves to `status`, stamping submit/fill/cancel times on first entry.
    ///
    /// No transition check is made.
    pub fn set_status(&mut self, status: OrderStatus, at: Timestamp) {
        match status {
            OrderStatus::Submitted => {
                self.submitted_at.get_or_insert(at);
            }
            OrderStatus::Filled => {
                self.filled_at.get_or_insert(at);
            }
            OrderStatus::Cancelled => {
                self.cancelled_at.get_or_insert(at);
            }
            _ => {}
        }
        self.status = status;
        self.updated_at = at;
    }

    /// Overwrites the filled quantity.
    pub fn set_filled_quantity(&mut self, filled: Decimal, at: Timestamp) {
        self.filled_quantity = filled;
        self.updated_at = at;
    }

    /// Overwrites fill quantity and average price.
    pub fn record_fill(&mut self, filled: Decimal, average_price: Decimal, at: Timestamp) {
        self.filled_quantity = filled;
        self.average_fill_price = Some(average_price);
        self.updated_at = at;
    }

    /// Marks the order cancelled at `at`, whatever its current status.
    pub fn cancel(&mut self, at: Timestamp) {
        self.status = OrderStatus::Cancelled;
        self.cancelled_at = Some(at);
        self.updated_at = at;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order({}, {} {} {} {}, {})",
            self.order_id,
            self.side,
            self.quantity,
            self.instrument_id,
            self.order_type,
            self.status
        )
    }
}
