//! # Domain Enums
//!
//! Enumerated status and classification fields of the persisted entities.
//!
//! - [`StrategyStatus`] - Lifecycle state of a strategy
//! - [`StrategyType`] - Strategy classification
//! - [`OrderSide`] - Buy or sell (shared by orders and trades)
//! - [`OrderType`] - Market, limit, stop, stop-limit
//! - [`OrderStatus`] - Execution state of an order
//! - [`TimeInForce`] - Order time-in-force instruction
//!
//! All enums serialize to the lower/snake-case names used on the wire
//! (`"buy"`, `"partially_filled"`) and implement `Display` and `FromStr`
//! with the same spelling. Parsing is case-insensitive and accepts `-` in
//! place of `_`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace('-', "_")
}

/// Lifecycle state of a trading strategy.
///
/// # Examples
///
/// ```
/// use trading_data_adapter::domain::value_objects::enums::StrategyStatus;
///
/// assert!(StrategyStatus::Active.is_running());
/// assert_eq!(StrategyStatus::Paused.to_string(), "paused");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    /// Configured but never started.
    #[default]
    Inactive,
    /// Running and allowed to trade.
    Active,
    /// Temporarily halted.
    Paused,
    /// Stopped by an operator.
    Stopped,
    /// Halted after a failure.
    Error,
}

impl StrategyStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }

    /// Returns true if the strategy is currently trading.
    #[inline]
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for StrategyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "inactive" => Ok(Self::Inactive),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "stopped" => Ok(Self::Stopped),
            "error" => Ok(Self::Error),
            _ => Err(ParseEnumError::InvalidValue("StrategyStatus", s.to_string())),
        }
    }
}

/// Strategy classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    /// Quotes both sides of the book.
    MarketMaking,
    /// Follows established trends.
    TrendFollowing,
    /// Trades reversion to a mean.
    MeanReversion,
    /// Exploits price differences across venues.
    Arbitrage,
    /// Trades price momentum.
    Momentum,
    /// Anything else.
    Custom,
}

impl StrategyType {
    /// Returns the wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketMaking => "market_making",
            Self::TrendFollowing => "trend_following",
            Self::MeanReversion => "mean_reversion",
            Self::Arbitrage => "arbitrage",
            Self::Momentum => "momentum",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "market_making" => Ok(Self::MarketMaking),
            "trend_following" => Ok(Self::TrendFollowing),
            "mean_reversion" => Ok(Self::MeanReversion),
            "arbitrage" => Ok(Self::Arbitrage),
            "momentum" => Ok(Self::Momentum),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseEnumError::InvalidValue("StrategyType", s.to_string())),
        }
    }
}

/// Order side indicating buy or sell direction.
///
/// Also used as the side of an executed trade.
///
/// # Examples
///
/// ```
/// use trading_data_adapter::domain::value_objects::enums::OrderSide;
///
/// assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
/// assert_eq!("SELL".parse::<OrderSide>().unwrap(), OrderSide::Sell);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    /// Acquire the instrument.
    Buy,
    /// Dispose of the instrument.
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns the wire name of the side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(ParseEnumError::InvalidValue("OrderSide", s.to_string())),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Execute at the best available price.
    Market,
    /// Execute at the limit price or better.
    Limit,
    /// Becomes a market order once the stop price trades.
    Stop,
    /// Becomes a limit order once the stop price trades.
    StopLimit,
}

impl OrderType {
    /// Returns the wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::Stop => "stop",
            Self::StopLimit => "stop_limit",
        }
    }

    /// Returns true if the order carries a limit price.
    #[inline]
    #[must_use]
    pub const fn requires_price(self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit)
    }

    /// Returns true if the order carries a stop price.
    #[inline]
    #[must_use]
    pub const fn requires_stop_price(self) -> bool {
        matches!(self, Self::Stop | Self::StopLimit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "market" => Ok(Self::Market),
            "limit" => Ok(Self::Limit),
            "stop" => Ok(Self::Stop),
            "stop_limit" | "stoplimit" => Ok(Self::StopLimit),
            _ => Err(ParseEnumError::InvalidValue("OrderType", s.to_string())),
        }
    }
}

/// Execution state of an order.
///
/// Orders start `Pending` and advance through the execution states. An order
/// is *active* (and cancellable) while pending, submitted, accepted or
/// partially filled.
///
/// # Examples
///
/// ```
/// use trading_data_adapter::domain::value_objects::enums::OrderStatus;
///
/// assert!(OrderStatus::PartiallyFilled.is_active());
/// assert!(OrderStatus::Filled.is_terminal());
/// assert_eq!(OrderStatus::PartiallyFilled.to_string(), "partially_filled");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, not yet sent.
    #[default]
    Pending,
    /// Sent to the exchange.
    Submitted,
    /// Acknowledged by the exchange.
    Accepted,
    /// Some quantity executed.
    PartiallyFilled,
    /// Fully executed.
    Filled,
    /// Cancelled before full execution.
    Cancelled,
    /// Refused by the exchange or a risk check.
    Rejected,
    /// Lapsed per its time-in-force.
    Expired,
}

impl OrderStatus {
    /// All statuses considered active.
    pub const ACTIVE: [Self; 4] = [
        Self::Pending,
        Self::Submitted,
        Self::Accepted,
        Self::PartiallyFilled,
    ];

    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Accepted => "accepted",
            Self::PartiallyFilled => "partially_filled",
            Self::Filled => "filled",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }

    /// Returns true if the order may still execute.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Submitted | Self::Accepted | Self::PartiallyFilled
        )
    }

    /// Returns true if the order can be cancelled.
    #[inline]
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        self.is_active()
    }

    /// Returns true if the order reached a final state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pending" => Ok(Self::Pending),
            "submitted" => Ok(Self::Submitted),
            "accepted" => Ok(Self::Accepted),
            "partially_filled" => Ok(Self::PartiallyFilled),
            "filled" => Ok(Self::Filled),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            _ => Err(ParseEnumError::InvalidValue("OrderStatus", s.to_string())),
        }
    }
}

/// Time-in-force instruction for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInForce {
    /// Good till cancel.
    #[default]
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
    /// Valid for the trading day.
    Day,
}

impl TimeInForce {
    /// Returns the wire name of the instruction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gtc => "gtc",
            Self::Ioc => "ioc",
            Self::Fok => "fok",
            Self::Day => "day",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeInForce {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "gtc" => Ok(Self::Gtc),
            "ioc" => Ok(Self::Ioc),
            "fok" => Ok(Self::Fok),
            "day" => Ok(Self::Day),
            _ => Err(ParseEnumError::InvalidValue("TimeInForce", s.to_string())),
        }
    }
}

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod order_status {
        use super::*;

        #[test]
        fn active_set_matches_predicate() {
            for status in OrderStatus::ACTIVE {
                assert!(status.is_active());
                assert!(status.is_cancellable());
            }
            for status in [
                OrderStatus::Filled,
                OrderStatus::Cancelled,
                OrderStatus::Rejected,
                OrderStatus::Expired,
            ] {
                assert!(status.is_terminal());
            }
        }

        #[test]
        fn parses_both_cancel_spellings() {
            assert_eq!(
                "canceled".parse::<OrderStatus>().unwrap(),
                OrderStatus::Cancelled
            );
            assert_eq!(
                "Partially-Filled".parse::<OrderStatus>().unwrap(),
                OrderStatus::PartiallyFilled
            );
        }

        #[test]
        fn serde_uses_snake_case() {
            let json = serde_json::to_string(&OrderStatus::PartiallyFilled).unwrap();
            assert_eq!(json, "\"partially_filled\"");
        }
    }

    mod order_type {
        use super::*;

        #[test]
        fn price_requirements() {
            assert!(OrderType::Limit.requires_price());
            assert!(!OrderType::Market.requires_price());
            assert!(OrderType::StopLimit.requires_stop_price());
            assert!(!OrderType::Limit.requires_stop_price());
        }
    }

    mod strategy {
        use super::*;

        #[test]
        fn type_round_trips_through_display() {
            for ty in [
                StrategyType::MarketMaking,
                StrategyType::TrendFollowing,
                StrategyType::MeanReversion,
                StrategyType::Arbitrage,
                StrategyType::Momentum,
                StrategyType::Custom,
            ] {
                assert_eq!(ty.to_string().parse::<StrategyType>().unwrap(), ty);
            }
        }

        #[test]
        fn default_status_is_inactive() {
            assert_eq!(StrategyStatus::default(), StrategyStatus::Inactive);
            assert!(!StrategyStatus::Paused.is_running());
        }
    }

    #[test]
    fn parse_error_display() {
        let err = "HOLD".parse::<OrderSide>().unwrap_err();
        assert_eq!(err.to_string(), "invalid OrderSide value: 'HOLD'");
    }

    #[test]
    fn time_in_force_defaults_to_gtc() {
        assert_eq!(TimeInForce::default(), TimeInForce::Gtc);
        assert_eq!("FOK".parse::<TimeInForce>().unwrap(), TimeInForce::Fok);
    }
}
