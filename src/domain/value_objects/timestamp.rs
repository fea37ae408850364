//! # Timestamp Value Object
//!
//! UTC instant used for every audit and lifecycle field.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::domain::value_objects::timestamp::Timestamp;
//!
//! let opened = Timestamp::from_secs(1_700_000_000).unwrap();
//! let later = opened.add_secs(90);
//!
//! assert!(later.is_after(&opened));
//! assert_eq!(later.seconds_since(&opened), 90);
//! ```

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>`; serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Creates a timestamp from calendar parts, in UTC.
    ///
    /// Returns `None` for an invalid date or time.
    ///
    /// # Examples
    ///
    /// ```
    /// use trading_data_adapter::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_ymd_hms(2025, 10, 3, 12, 0, 0).unwrap();
    /// assert_eq!(ts.to_string(), "2025-10-03T12:00:00+00:00");
    /// assert!(Timestamp::from_ymd_hms(2025, 2, 30, 0, 0, 0).is_none());
    /// ```
    #[must_use]
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Adds seconds (may be negative).
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Subtracts seconds.
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Returns true if this timestamp is before another.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns true if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Signed elapsed time from `earlier` to `self`.
    #[must_use]
    pub fn elapsed_since(&self, earlier: &Self) -> Duration {
        self.0 - earlier.0
    }

    /// Whole seconds from `earlier` to `self`, negative if `earlier` is later.
    #[must_use]
    pub fn seconds_since(&self, earlier: &Self) -> i64 {
        self.elapsed_since(earlier).num_seconds()
    }

    /// Returns true if `self` lies in `[from, to]`, with either bound optional.
    #[must_use]
    pub fn is_within(&self, from: Option<&Self>, to: Option<&Self>) -> bool {
        from.is_none_or(|f| self >= f) && to.is_none_or(|t| self <= t)
    }

    /// The UTC calendar date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Returns the underlying DateTime.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
