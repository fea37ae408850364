//! # Health Reporting
//!
//! Connection state and health reports produced by the facade.

use crate::domain::value_objects::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall adapter health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every configured backend answered.
    #[default]
    Healthy,
    /// At least one configured backend failed its probe.
    Degraded,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
        }
    }
}

/// Result of probing one backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackendHealth {
    /// Whether the probe succeeded.
    pub connected: bool,
    /// Probe failure, if any.
    pub error: Option<String>,
}

impl BackendHealth {
    /// A successful probe.
    #[must_use]
    pub fn connected() -> Self {
        Self {
            connected: true,
            error: None,
        }
    }

    /// A failed probe.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            connected: false,
            error: Some(error.into()),
        }
    }

    /// Returns true if the probe failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Health of the adapter and its backends.
///
/// A backend with no probe configured is reported as not connected
/// without an error and does not degrade the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status.
    pub status: HealthStatus,
    /// Relational store.
    pub postgres: BackendHealth,
    /// Cache store.
    pub redis: BackendHealth,
    /// When the report was produced.
    pub checked_at: Timestamp,
}

impl HealthReport {
    /// Builds a report, deriving the status from the backend results.
    #[must_use]
    pub fn new(postgres: BackendHealth, redis: BackendHealth, checked_at: Timestamp) -> Self {
        let status = if postgres.is_failed() || redis.is_failed() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
        Self {
            status,
            postgres,
            redis,
            checked_at,
        }
    }

    /// Returns true if no backend failed.
    #[inline]
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }

    /// Number of backends whose probe failed.
    #[must_use]
    pub fn degraded_backends(&self) -> usize {
        [&self.postgres, &self.redis]
            .iter()
            .filter(|b| b.is_failed())
            .count()
    }
}

/// Last known connection state of one backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackendConnection {
    /// Whether the last probe succeeded and no disconnect followed.
    pub connected: bool,
    /// Time of the last successful probe.
    pub last_check: Option<Timestamp>,
    /// Error from the last failed probe.
    pub error: Option<String>,
}

impl BackendConnection {
    pub(crate) fn record(&mut self, health: &BackendHealth, at: Timestamp) {
        if health.connected {
            self.connected = true;
            self.last_check = Some(at);
            self.error = None;
        } else if let Some(error) = &health.error {
            self.connected = false;
            self.error = Some(error.clone());
        }
    }
}

/// Connection state tracked by the facade across `connect` and `disconnect`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Relational store.
    pub postgres: BackendConnection,
    /// Cache store.
    pub redis: BackendConnection,
}

impl ConnectionStatus {
    /// Returns true if both backends are connected.
    #[must_use]
    pub fn all_connected(&self) -> bool {
        self.postgres.connected && self.redis.connected
    }
}
