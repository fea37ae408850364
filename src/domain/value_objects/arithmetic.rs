//! # Checked Arithmetic
//!
//! Overflow-checked arithmetic for monetary fields and counters.
//!
//! Every P&L, exposure and volume figure in this crate is a
//! [`rust_decimal::Decimal`]; binary floating point never touches money.
//! Aggregations go through [`checked_sum`] so that a pathological sum
//! surfaces as an [`ArithmeticError`] instead of a panic.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::domain::value_objects::arithmetic::{checked_sum, CheckedArithmetic};
//! use rust_decimal::Decimal;
//!
//! let total = checked_sum([Decimal::new(1050, 2), Decimal::new(250, 2)]).unwrap();
//! assert_eq!(total, Decimal::new(13, 0));
//!
//! let product = Decimal::new(25, 1).safe_mul(Decimal::new(4, 0)).unwrap();
//! assert_eq!(product, Decimal::new(10, 0));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Result exceeded the representable range.
    #[error("arithmetic overflow")]
    Overflow,

    /// Result fell below the representable range.
    #[error("arithmetic underflow")]
    Underflow,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Checked arithmetic that reports failure instead of panicking.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely subtract two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would underflow.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }
}

impl CheckedArithmetic for i64 {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(if rhs < 0 {
            ArithmeticError::Underflow
        } else {
            ArithmeticError::Overflow
        })
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(if rhs > 0 {
            ArithmeticError::Underflow
        } else {
            ArithmeticError::Overflow
        })
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Sums decimals exactly, failing on overflow.
///
/// An empty iterator sums to zero.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if any partial sum overflows.
pub fn checked_sum<I>(values: I) -> ArithmeticResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.safe_add(value))
}
