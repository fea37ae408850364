//! # Strategy Entity
//!
//! Configuration and running state of a trading strategy.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::domain::entities::Strategy;
//! use trading_data_adapter::domain::value_objects::{StrategyId, StrategyStatus, StrategyType};
//!
//! let strategy = Strategy::new(
//!     StrategyId::new("strat-001"),
//!     "BTC Market Making",
//!     StrategyType::MarketMaking,
//!     StrategyStatus::Active,
//! )
//! .unwrap()
//! .with_instrument("BTC-USD")
//! .with_parameter("spread", serde_json::json!(0.001));
//!
//! assert!(strategy.trades_instrument("BTC-USD"));
//! assert_eq!(strategy.total_trades(), 0);
//! ```

use crate::domain::errors::{DomainResult, require_non_empty};
use crate::domain::value_objects::{StrategyId, StrategyStatus, StrategyType, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Optional risk limits attached to a strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Maximum position size.
    pub max_position_size: Option<Decimal>,
    /// Maximum loss tolerated in one day.
    pub max_daily_loss: Option<Decimal>,
    /// Maximum leverage ratio.
    pub max_leverage: Option<Decimal>,
}

/// A trading strategy.
///
/// # Invariants
///
/// - `strategy_id` and `name` are non-empty
/// - P&L fields are exact decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    strategy_id: StrategyId,
    name: String,
    strategy_type: StrategyType,
    status: StrategyStatus,
    parameters: BTreeMap<String, serde_json::Value>,
    instruments: BTreeSet<String>,
    risk_limits: RiskLimits,
    total_pnl: Decimal,
    daily_pnl: Decimal,
    total_trades: u64,
    started_at: Option<Timestamp>,
    stopped_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Strategy {
    /// Creates a strategy with zeroed performance counters.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the id or name is blank.
    pub fn new(
        strategy_id: StrategyId,
        name: impl Into<String>,
        strategy_type: StrategyType,
        status: StrategyStatus,
    ) -> DomainResult<Self> {
        let name = name.into();
        require_non_empty("Strategy", "strategy_id", strategy_id.as_str())?;
        require_non_empty("Strategy", "name", &name)?;
        let now = Timestamp::now();
        Ok(Self {
            strategy_id,
            name,
            strategy_type,
            status,
            parameters: BTreeMap::new(),
            instruments: BTreeSet::new(),
            risk_limits: RiskLimits::default(),
            total_pnl: Decimal::ZERO,
            daily_pnl: Decimal::ZERO,
            total_trades: 0,
            started_at: None,
            stopped_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Adds a configuration parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Adds a traded instrument.
    #[must_use]
    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instruments.insert(instrument.into());
        self
    }

    /// Sets the risk limits.
    #[must_use]
    pub fn with_risk_limits(mut self, limits: RiskLimits) -> Self {
        self.risk_limits = limits;
        self
    }

    /// Sets the P&L figures.
    #[must_use]
    pub fn with_pnl(mut self, total_pnl: Decimal, daily_pnl: Decimal) -> Self {
        self.total_pnl = total_pnl;
        self.daily_pnl = daily_pnl;
        self
    }

    /// Sets the trade counter.
    #[must_use]
    pub fn with_total_trades(mut self, total_trades: u64) -> Self {
        self.total_trades = total_trades;
        self
    }

    /// Returns the strategy ID.
    #[inline]
    #[must_use]
    pub fn strategy_id(&self) -> &StrategyId {
        &self.strategy_id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the classification.
    #[inline]
    #[must_use]
    pub fn strategy_type(&self) -> StrategyType {
        self.strategy_type
    }

    /// Returns the lifecycle status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> StrategyStatus {
        self.status
    }

    /// Returns the configuration parameters.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.parameters
    }

    /// Returns the traded instruments.
    #[must_use]
    pub fn instruments(&self) -> &BTreeSet<String> {
        &self.instruments
    }

    /// Returns the risk limits.
    #[must_use]
    pub fn risk_limits(&self) -> &RiskLimits {
        &self.risk_limits
    }

    /// Returns the total P&L.
    #[inline]
    #[must_use]
    pub fn total_pnl(&self) -> Decimal {
        self.total_pnl
    }

    /// Returns today's P&L.
    #[inline]
    #[must_use]
    pub fn daily_pnl(&self) -> Decimal {
        self.daily_pnl
    }

    /// Returns the number of trades executed.
    #[inline]
    #[must_use]
    pub fn total_trades(&self) -> u64 {
        self.total_trades
    }

    /// When the strategy was last started.
    #[must_use]
    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    /// When the strategy was last stopped.
    #[must_use]
    pub fn stopped_at(&self) -> Option<Timestamp> {
        self.stopped_at
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last modification time.
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns true if the strategy trades `instrument`.
    #[must_use]
    pub fn trades_instrument(&self, instrument: &str) -> bool {
        self.instruments.contains(instrument)
    }

    /// Changes the status, stamping start/stop times on the relevant transitions.
    pub fn set_status(&mut self, status: StrategyStatus, at: Timestamp) {
        match status {
            StrategyStatus::Active if self.status != StrategyStatus::Active => {
                self.started_at = Some(at);
            }
            StrategyStatus::Stopped if self.status != StrategyStatus::Stopped => {
                self.stopped_at = Some(at);
            }
            _ => {}
        }
        self.status = status;
        self.updated_at = at;
    }

    /// Overwrites the P&L figures.
    pub fn set_pnl(&mut self, total_pnl: Decimal, daily_pnl: Decimal, at: Timestamp) {
        self.total_pnl = total_pnl;
        self.daily_pnl = daily_pnl;
        self.updated_at = at;
    }

    /// Counts one more executed trade.
    pub fn record_trade(&mut self, at: Timestamp) {
        self.total_trades = self.total_trades.saturating_add(1);
        self.updated_at = at;
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Strategy({}, {}, {}, {})",
            self.strategy_id, self.name, self.strategy_type, self.status
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;

    fn strategy(status: StrategyStatus) -> Strategy {
        Strategy::new(
            StrategyId::new("strat_001"),
            "Test Strategy",
            StrategyType::MarketMaking,
            status,
        )
        .unwrap()
    }

    #[test]
    fn new_zeroes_performance() {
        let s = strategy(StrategyStatus::Active);
        assert_eq!(s.total_pnl(), Decimal::ZERO);
        assert_eq!(s.daily_pnl(), Decimal::ZERO);
        assert_eq!(s.total_trades(), 0);
        assert!(s.started_at().is_none());
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Strategy::new(
            StrategyId::new("strat_001"),
            "",
            StrategyType::Custom,
            StrategyStatus::Inactive,
        )
        .unwrap_err();
        assert_eq!(err, DomainError::missing_field("Strategy", "name"));
    }

    #[test]
    fn instruments_behave_as_a_set() {
        let s = strategy(StrategyStatus::Inactive)
            .with_instrument("BTC-USD")
            .with_instrument("ETH-USD")
            .with_instrument("BTC-USD");
        assert_eq!(s.instruments().len(), 2);
        assert!(s.trades_instrument("ETH-USD"));
        assert!(!s.trades_instrument("SOL-USD"));
    }

    #[test]
    fn activation_and_stop_are_stamped() {
        let mut s = strategy(StrategyStatus::Inactive);
        let t0 = Timestamp::from_secs(1_700_000_000).unwrap();
        s.set_status(StrategyStatus::Active, t0);
        assert_eq!(s.started_at(), Some(t0));

        let t1 = t0.add_secs(60);
        s.set_status(StrategyStatus::Stopped, t1);
        assert_eq!(s.stopped_at(), Some(t1));
        assert_eq!(s.updated_at(), t1);
    }

    #[test]
    fn record_trade_increments() {
        let mut s = strategy(StrategyStatus::Active).with_total_trades(141);
        s.record_trade(Timestamp::now());
        assert_eq!(s.total_trades(), 142);
    }

    #[test]
    fn serde_roundtrip_preserves_decimals() {
        let s = strategy(StrategyStatus::Active)
            .with_pnl(Decimal::new(150050, 2), Decimal::new(25000, 2))
            .with_parameter("spread", serde_json::json!(0.001));
        let json = serde_json::to_string(&s).unwrap();
        let back: Strategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.total_pnl(), Decimal::new(150050, 2));
    }
}
