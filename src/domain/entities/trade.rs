//! # Trade Entity
//!
//! An executed fill. Trades are append-only: once stored they are never
//! updated, only deleted.
//!
//! `gross_value` and `net_value` are stored as given. [`Trade::new`]
//! seeds them from `quantity * price`, and [`Trade::with_commission`]
//! derives `net_value = gross_value - commission`; [`Trade::with_values`]
//! overrides all three without checking.

use crate::domain::errors::{DomainError, DomainResult, require_non_empty};
use crate::domain::value_objects::{
    CheckedArithmetic, OrderId, OrderSide, StrategyId, Timestamp, TradeId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An executed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    trade_id: TradeId,
    order_id: OrderId,
    strategy_id: StrategyId,
    instrument_id: String,
    side: OrderSide,
    quantity: Decimal,
    price: Decimal,
    gross_value: Decimal,
    commission: Decimal,
    net_value: Decimal,
    exchange_trade_id: Option<String>,
    execution_venue: String,
    liquidity_flag: Option<String>,
    realized_pnl: Option<Decimal>,
    executed_at: Timestamp,
    created_at: Timestamp,
    notes: Option<String>,
}

impl Trade {
    /// Creates a trade with `gross_value = net_value = quantity * price`.
    ///
    /// # Errors
    ///
    /// - `DomainError::MissingField` for blank identifiers or venue
    /// - `DomainError::Validation` if `quantity` is not positive or `price` is negative
    /// - `DomainError::Arithmetic` if the gross value overflows
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trade_id: TradeId,
        order_id: OrderId,
        strategy_id: StrategyId,
        instrument_id: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        execution_venue: impl Into<String>,
        executed_at: Timestamp,
    ) -> DomainResult<Self> {
        let instrument_id = instrument_id.into();
        let execution_venue = execution_venue.into();
        require_non_empty("Trade", "trade_id", trade_id.as_str())?;
        require_non_empty("Trade", "order_id", order_id.as_str())?;
        require_non_empty("Trade", "strategy_id", strategy_id.as_str())?;
        require_non_empty("Trade", "instrument_id", &instrument_id)?;
        require_non_empty("Trade", "execution_venue", &execution_venue)?;
        if quantity <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "trade quantity must be positive, got {quantity}"
            )));
        }
        if price < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "trade price must not be negative, got {price}"
            )));
        }
        let gross_value = quantity.safe_mul(price)?;
        Ok(Self {
            trade_id,
            order_id,
            strategy_id,
            instrument_id,
            side,
            quantity,
            price,
            gross_value,
            commission: Decimal::ZERO,
            net_value: gross_value,
            exchange_trade_id: None,
            execution_venue,
            liquidity_flag: None,
            realized_pnl: None,
            executed_at,
            created_at: Timestamp::now(),
            notes: None,
        })
    }

    /// Sets the commission and recomputes `net_value = gross_value - commission`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn with_commission(mut self, commission: Decimal) -> DomainResult<Self> {
        self.net_value = self.gross_value.safe_sub(commission)?;
        self.commission = commission;
        Ok(self)
    }

    /// Overrides the financial figures as reported by the venue.
    #[must_use]
    pub fn with_values(mut self, gross_value: Decimal, commission: Decimal, net_value: Decimal) -> Self {
        self.gross_value = gross_value;
        self.commission = commission;
        self.net_value = net_value;
        self
    }

    /// Sets the exchange-assigned trade ID.
    #[must_use]
    pub fn with_exchange_trade_id(mut self, id: impl Into<String>) -> Self {
        self.exchange_trade_id = Some(id.into());
        self
    }

    /// Sets the realized P&L booked by this fill.
    #[must_use]
    pub fn with_realized_pnl(mut self, pnl: Decimal) -> Self {
        self.realized_pnl = Some(pnl);
        self
    }

    /// Sets the maker/taker flag.
    #[must_use]
    pub fn with_liquidity_flag(mut self, flag: impl Into<String>) -> Self {
        self.liquidity_flag = Some(flag.into());
        self
    }

    /// Attaches free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Returns the trade ID.
    #[inline]
    #[must_use]
    pub fn trade_id(&self) -> &TradeId {
        &self.trade_id
    }

    /// Returns the originating order.
    #[inline]
    #[must_use]
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Returns the originating strategy.
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

    /// Returns the executed quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Returns the execution price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the gross value.
    #[inline]
    #[must_use]
    pub fn gross_value(&self) -> Decimal {
        self.gross_value
    }

    /// Returns the commission.
    #[inline]
    #[must_use]
    pub fn commission(&self) -> Decimal {
        self.commission
    }

    /// Returns the net value.
    #[inline]
    #[must_use]
    pub fn net_value(&self) -> Decimal {
        self.net_value
    }

    /// Returns the exchange trade ID.
    #[must_use]
    pub fn exchange_trade_id(&self) -> Option<&str> {
        self.exchange_trade_id.as_deref()
    }

    /// Returns the venue.
    #[must_use]
    pub fn execution_venue(&self) -> &str {
        &self.execution_venue
    }

    /// Returns the maker/taker flag.
    #[must_use]
    pub fn liquidity_flag(&self) -> Option<&str> {
        self.liquidity_flag.as_deref()
    }

    /// Returns the realized P&L.
    #[must_use]
    pub fn realized_pnl(&self) -> Option<Decimal> {
        self.realized_pnl
    }

    /// Execution time.
    #[inline]
    #[must_use]
    pub fn executed_at(&self) -> Timestamp {
        self.executed_at
    }

    /// Record creation time.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade({}, {} {} {} @ {})",
            self.trade_id, self.side, self.quantity, self.instrument_id, self.price
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn trade() -> Trade {
        Trade::new(
            TradeId::new("trade-001"),
            OrderId::new("ord-001"),
            StrategyId::new("strat-001"),
            "BTC-USD",
            OrderSide::Buy,
            Decimal::new(5, 1),
            Decimal::new(5000000, 2),
            "exchange-simulator",
            Timestamp::from_ymd_hms(2025, 10, 3, 12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn gross_value_is_quantity_times_price() {
        let t = trade();
        assert_eq!(t.gross_value(), Decimal::new(25000, 0));
        assert_eq!(t.net_value(), t.gross_value());
        assert_eq!(t.commission(), Decimal::ZERO);
    }

    #[test]
    fn commission_reduces_net_value() {
        let t = trade().with_commission(Decimal::new(750, 2)).unwrap();
        assert_eq!(t.net_value(), Decimal::new(2499250, 2));
    }

    #[test]
    fn values_can_be_overridden() {
        let t = trade().with_values(Decimal::ONE, Decimal::TWO, Decimal::TEN);
        assert_eq!(t.gross_value(), Decimal::ONE);
        assert_eq!(t.net_value(), Decimal::TEN);
    }

    #[test]
    fn blank_venue_is_rejected() {
        let err = Trade::new(
            TradeId::new("t"),
            OrderId::new("o"),
            StrategyId::new("s"),
            "BTC-USD",
            OrderSide::Sell,
            Decimal::ONE,
            Decimal::ONE,
            "",
            Timestamp::now(),
        )
        .unwrap_err();
        assert_eq!(err, DomainError::missing_field("Trade", "execution_venue"));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = Trade::new(
            TradeId::new("t"),
            OrderId::new("o"),
            StrategyId::new("s"),
            "BTC-USD",
            OrderSide::Sell,
            Decimal::NEGATIVE_ONE,
            Decimal::ONE,
            "venue",
            Timestamp::now(),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
