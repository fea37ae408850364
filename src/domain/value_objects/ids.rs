//! # Identifiers
//!
//! String-backed identifier newtypes for every persisted entity.
//!
//! Identifiers are assigned once at creation and never reused. Callers may
//! supply their own (e.g. `"strat-001"`) or call `generate()` for a fresh
//! UUID v4 based value.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::domain::value_objects::ids::{OrderId, StrategyId};
//!
//! let strategy = StrategyId::new("strat-001");
//! assert_eq!(strategy.as_str(), "strat-001");
//!
//! let a = OrderId::generate();
//! let b = OrderId::generate();
//! assert_ne!(a, b);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is blank.
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a trading strategy.
    StrategyId
);

string_id!(
    /// Identifier of an order.
    OrderId
);

string_id!(
    /// Identifier of an executed trade.
    TradeId
);

string_id!(
    /// Identifier of a position.
    PositionId
);

string_id!(
    /// Identifier of a registered service instance.
    ServiceId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_inner_value() {
        assert_eq!(TradeId::new("trade-001").to_string(), "trade-001");
    }

    #[test]
    fn generated_ids_are_uuids() {
        let id = PositionId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn blank_id_is_empty() {
        assert!(ServiceId::new("   ").is_empty());
        assert!(!ServiceId::new("svc-1").is_empty());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&StrategyId::new("strat-001")).unwrap();
        assert_eq!(json, "\"strat-001\"");
        let back: StrategyId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StrategyId::new("strat-001"));
    }
}
