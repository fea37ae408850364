//! # Position Entity
//!
//! Aggregated holding of one instrument by one strategy.
//!
//! Quantity is signed: positive is long, negative is short. The derived
//! market fields are recomputed by [`Position::reprice`]:
//!
//! ```text
//! market_value   = quantity * price
//! unrealized_pnl = (price - average_entry_price) * quantity
//! total_pnl      = realized_pnl + unrealized_pnl
//! exposure       = |quantity| * price
//! ```
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::domain::entities::Position;
//! use trading_data_adapter::domain::value_objects::{PositionId, StrategyId, Timestamp};
//! use rust_decimal::Decimal;
//!
//! let position = Position::new(
//!     PositionId::new("pos-001"),
//!     StrategyId::new("strat-001"),
//!     "BTC-USD",
//!     Decimal::new(25, 1),
//!     Decimal::new(48000, 0),
//!     Decimal::new(50000, 0),
//!     Timestamp::now(),
//! )
//! .unwrap();
//!
//! assert_eq!(position.exposure(), Decimal::new(125000, 0));
//! assert_eq!(position.unrealized_pnl(), Decimal::new(5000, 0));
//! assert!(position.is_open());
//! ```

use crate::domain::errors::{DomainResult, require_non_empty};
use crate::domain::value_objects::{
    ArithmeticResult, CheckedArithmetic, PositionId, StrategyId, Timestamp,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strategy's position in one instrument.
///
/// # Invariants
///
/// After every [`Position::reprice`]:
/// - `exposure == |quantity| * current_price`
/// - `total_pnl == realized_pnl + unrealized_pnl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    position_id: PositionId,
    strategy_id: StrategyId,
    instrument_id: String,
    quantity: Decimal,
    average_entry_price: Decimal,
    current_price: Decimal,
    market_value: Decimal,
    unrealized_pnl: Decimal,
    realized_pnl: Decimal,
    total_pnl: Decimal,
    cost_basis: Decimal,
    exposure: Decimal,
    opened_at: Timestamp,
    last_updated: Timestamp,
    closed_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
    notes: Option<String>,
}

impl Position {
    /// Opens a position and prices it at `current_price`.
    ///
    /// `cost_basis` is `|quantity| * average_entry_price`.
    ///
    /// # Errors
    ///
    /// - `DomainError::MissingField` for blank identifiers
    /// - `DomainError::Arithmetic` if a derived field overflows
    pub fn new(
        position_id: PositionId,
        strategy_id: StrategyId,
        instrument_id: impl Into<String>,
        quantity: Decimal,
        average_entry_price: Decimal,
        current_price: Decimal,
        opened_at: Timestamp,
    ) -> DomainResult<Self> {
        let instrument_id = instrument_id.into();
        require_non_empty("Position", "position_id", position_id.as_str())?;
        require_non_empty("Position", "strategy_id", strategy_id.as_str())?;
        require_non_empty("Position", "instrument_id", &instrument_id)?;
        let cost_basis = quantity.abs().safe_mul(average_entry_price)?;
        let now = Timestamp::now();
        let mut position = Self {
            position_id,
            strategy_id,
            instrument_id,
            quantity,
            average_entry_price,
            current_price,
            market_value: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            total_pnl: Decimal::ZERO,
            cost_basis,
            exposure: Decimal::ZERO,
            opened_at,
            last_updated: opened_at,
            closed_at: None,
            created_at: now,
            updated_at: now,
            notes: None,
        };
        position.reprice(current_price, opened_at)?;
        Ok(position)
    }

    /// Sets realized P&L and refreshes `total_pnl`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn with_realized_pnl(mut self, realized_pnl: Decimal) -> DomainResult<Self> {
        self.total_pnl = realized_pnl.safe_add(self.unrealized_pnl)?;
        self.realized_pnl = realized_pnl;
        Ok(self)
    }

    /// Overrides the cost basis.
    #[must_use]
    pub fn with_cost_basis(mut self, cost_basis: Decimal) -> Self {
        self.cost_basis = cost_basis;
        self
    }

    /// Attaches free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Returns the position ID.
    #[inline]
    #[must_use]
    pub fn position_id(&self) -> &PositionId {
        &self.position_id
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

    /// Returns the signed quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Returns the average entry price.
    #[inline]
    #[must_use]
    pub fn average_entry_price(&self) -> Decimal {
        self.average_entry_price
    }

    /// Returns the last mark price.
    #[inline]
    #[must_use]
    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    /// Returns the market value.
    #[inline]
    #[must_use]
    pub fn market_value(&self) -> Decimal {
        self.market_value
    }

    /// Returns the unrealized P&L.
    #[inline]
    #[must_use]
    pub fn unrealized_pnl(&self) -> Decimal {
        self.unrealized_pnl
    }

    /// Returns the realized P&L.
    #[inline]
    #[must_use]
    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    /// Returns the total P&L.
    #[inline]
    #[must_use]
    pub fn total_pnl(&self) -> Decimal {
        self.total_pnl
    }

    /// Returns the cost basis.
    #[must_use]
    pub fn cost_basis(&self) -> Decimal {
        self.cost_basis
    }

    /// Returns the exposure.
    #[inline]
    #[must_use]
    pub fn exposure(&self) -> Decimal {
        self.exposure
    }

    /// When the position was opened.
    #[must_use]
    pub fn opened_at(&self) -> Timestamp {
        self.opened_at
    }

    /// When market data was last applied.
    #[must_use]
    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    /// When the position was closed.
    #[must_use]
    pub fn closed_at(&self) -> Option<Timestamp> {
        self.closed_at
    }

    /// Record creation time.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last modification time.
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns true if quantity is non-zero and the position is not closed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.quantity.is_zero() && self.closed_at.is_none()
    }

    /// Returns true for a long position.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Applies a new mark price and recomputes every derived field.
    ///
    /// The position is left untouched if any computation overflows.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError` on overflow.
    pub fn reprice(&mut self, price: Decimal, at: Timestamp) -> ArithmeticResult<()> {
        let market_value = self.quantity.safe_mul(price)?;
        let unrealized_pnl = price
            .safe_sub(self.average_entry_price)?
            .safe_mul(self.quantity)?;
        let total_pnl = self.realized_pnl.safe_add(unrealized_pnl)?;
        let exposure = self.quantity.abs().safe_mul(price)?;

        self.current_price = price;
        self.market_value = market_value;
        self.unrealized_pnl = unrealized_pnl;
        self.total_pnl = total_pnl;
        self.exposure = exposure;
        self.last_updated = at;
        self.updated_at = at;
        Ok(())
    }

    /// Marks the position closed at `at`.
    pub fn close(&mut self, at: Timestamp) {
        self.closed_at = Some(at);
        self.updated_at = at;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position({}, {} {} @ {})",
            self.position_id, self.quantity, self.instrument_id, self.current_price
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;

    fn position(quantity: Decimal) -> Position {
        Position::new(
            PositionId::new("pos-001"),
            StrategyId::new("strat-001"),
            "BTC-USD",
            quantity,
            Decimal::new(48000, 0),
            Decimal::new(50000, 0),
            Timestamp::from_ymd_hms(2025, 10, 1, 10, 0, 0).unwrap(),
        )
        .unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn derived_fields_for_long() {
            let p = position(Decimal::new(25, 1));
            assert_eq!(p.market_value(), Decimal::new(125000, 0));
            assert_eq!(p.unrealized_pnl(), Decimal::new(5000, 0));
            assert_eq!(p.cost_basis(), Decimal::new(120000, 0));
            assert_eq!(p.total_pnl(), Decimal::new(5000, 0));
            assert!(p.is_long());
        }

        #[test]
        fn short_has_positive_exposure() {
            let p = position(Decimal::new(-2, 0));
            assert_eq!(p.market_value(), Decimal::new(-100000, 0));
            assert_eq!(p.exposure(), Decimal::new(100000, 0));
            assert_eq!(p.unrealized_pnl(), Decimal::new(-4000, 0));
            assert_eq!(p.cost_basis(), Decimal::new(96000, 0));
        }

        #[test]
        fn realized_pnl_feeds_total() {
            let p = position(Decimal::ONE)
                .with_realized_pnl(Decimal::new(1500, 0))
                .unwrap();
            assert_eq!(p.total_pnl(), Decimal::new(3500, 0));
        }

        #[test]
        fn blank_strategy_is_rejected() {
            let err = Position::new(
                PositionId::new("p"),
                StrategyId::new(""),
                "BTC-USD",
                Decimal::ONE,
                Decimal::ONE,
                Decimal::ONE,
                Timestamp::now(),
            )
            .unwrap_err();
            assert_eq!(err, DomainError::missing_field("Position", "strategy_id"));
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn reprice_updates_every_derived_field() {
            let mut p = position(Decimal::TWO)
                .with_realized_pnl(Decimal::new(100, 0))
                .unwrap();
            let at = Timestamp::from_ymd_hms(2025, 10, 3, 12, 0, 0).unwrap();
            p.reprice(Decimal::new(47000, 0), at).unwrap();
            assert_eq!(p.current_price(), Decimal::new(47000, 0));
            assert_eq!(p.market_value(), Decimal::new(94000, 0));
            assert_eq!(p.unrealized_pnl(), Decimal::new(-2000, 0));
            assert_eq!(p.total_pnl(), Decimal::new(-1900, 0));
            assert_eq!(p.exposure(), Decimal::new(94000, 0));
            assert_eq!(p.last_updated(), at);
        }

        #[test]
        fn flat_position_is_not_open() {
            assert!(!position(Decimal::ZERO).is_open());
        }

        #[test]
        fn closed_position_is_not_open() {
            let mut p = position(Decimal::ONE);
            p.close(Timestamp::now());
            assert!(!p.is_open());
            assert!(p.closed_at().is_some());
        }
    }
}
