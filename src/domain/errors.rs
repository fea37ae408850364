//! # Domain Errors
//!
//! Errors raised while constructing domain objects.
//!
//! Validation happens at construction time, before an entity ever reaches a
//! repository. A [`DomainError`] is fatal to the operation that produced it
//! and is propagated to the caller unmodified.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::domain::errors::DomainError;
//!
//! let err = DomainError::missing_field("Order", "order_id");
//! assert!(err.is_validation());
//! assert!(err.to_string().contains("order_id"));
//! ```

use crate::domain::value_objects::arithmetic::ArithmeticError;
use thiserror::Error;

/// Error type for domain construction and invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required field was missing or empty.
    #[error("validation error: {entity} requires a non-empty {field}")]
    MissingField {
        /// Entity being constructed.
        entity: &'static str,
        /// Offending field.
        field: &'static str,
    },

    /// A field carried a value outside its allowed range.
    #[error("validation error: {0}")]
    Validation(String),

    /// Decimal arithmetic failed while deriving a field.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }

    /// Creates a generic validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns true if this error came from input validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::Validation(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Rejects empty or whitespace-only strings for a required field.
///
/// # Errors
///
/// Returns [`DomainError::MissingField`] when `value` is blank.
pub(crate) fn require_non_empty(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::missing_field(entity, field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_entity_and_field() {
        let err = DomainError::missing_field("Trade", "execution_venue");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "validation error: Trade requires a non-empty execution_venue"
        );
    }

    #[test]
    fn arithmetic_is_not_validation() {
        let err: DomainError = ArithmeticError::Overflow.into();
        assert!(!err.is_validation());
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn require_non_empty_rejects_blank() {
        assert!(require_non_empty("Strategy", "name", "  ").is_err());
        assert!(require_non_empty("Strategy", "name", "mm-1").is_ok());
    }
}
