//! # Service Registration
//!
//! Registry entry for a running service instance.
//!
//! `status` is a free-form string; only the exact value
//! [`ServiceInfo::HEALTHY`] is treated as healthy by the registry.

use crate::domain::errors::{DomainResult, require_non_empty};
use crate::domain::value_objects::{ServiceId, Timestamp};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A registered service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    service_id: ServiceId,
    service_name: String,
    version: String,
    host: String,
    grpc_port: u16,
    http_port: u16,
    status: String,
    metadata: BTreeMap<String, String>,
    last_seen: Timestamp,
    registered_at: Timestamp,
}

impl ServiceInfo {
    /// Status string reported by healthy services.
    pub const HEALTHY: &'static str = "healthy";

    /// Creates a healthy registration stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the id, name or host is blank.
    pub fn new(
        service_id: ServiceId,
        service_name: impl Into<String>,
        version: impl Into<String>,
        host: impl Into<String>,
        grpc_port: u16,
        http_port: u16,
    ) -> DomainResult<Self> {
        let service_name = service_name.into();
        let host = host.into();
        require_non_empty("ServiceInfo", "service_id", service_id.as_str())?;
        require_non_empty("ServiceInfo", "service_name", &service_name)?;
        require_non_empty("ServiceInfo", "host", &host)?;
        let now = Timestamp::now();
        Ok(Self {
            service_id,
            service_name,
            version: version.into(),
            host,
            grpc_port,
            http_port,
            status: Self::HEALTHY.to_string(),
            metadata: BTreeMap::new(),
            last_seen: now,
            registered_at: now,
        })
    }

    /// Sets the status string.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Overrides both registration and last-seen times.
    #[must_use]
    pub fn with_registered_at(mut self, at: Timestamp) -> Self {
        self.registered_at = at;
        self.last_seen = at;
        self
    }

    /// Overrides the last-seen time.
    #[must_use]
    pub fn with_last_seen(mut self, at: Timestamp) -> Self {
        self.last_seen = at;
        self
    }

    /// Returns the service ID.
    #[inline]
    #[must_use]
    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    /// Returns the logical service name.
    #[inline]
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the gRPC port.
    #[must_use]
    pub fn grpc_port(&self) -> u16 {
        self.grpc_port
    }

    /// Returns the HTTP port.
    #[must_use]
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Returns the status string.
    #[inline]
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the metadata.
    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Last heartbeat time.
    #[inline]
    #[must_use]
    pub fn last_seen(&self) -> Timestamp {
        self.last_seen
    }

    /// Registration time.
    #[must_use]
    pub fn registered_at(&self) -> Timestamp {
        self.registered_at
    }

    /// Returns true if the status is exactly `"healthy"`.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == Self::HEALTHY
    }

    /// Records a heartbeat. `last_seen` never moves backwards.
    pub fn heartbeat(&mut self, at: Timestamp) {
        self.last_seen = self.last_seen.max(at);
    }

    /// Replaces the status string.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Returns true if more than `threshold_secs` have passed since the last heartbeat.
    #[must_use]
    pub fn is_stale(&self, now: Timestamp, threshold_secs: u64) -> bool {
        let Ok(secs) = i64::try_from(threshold_secs) else {
            return false;
        };
        Duration::try_seconds(secs).is_some_and(|t| now.elapsed_since(&self.last_seen) > t)
    }
}

impl fmt::Display for ServiceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{} ({}, {})",
            self.service_name, self.host, self.grpc_port, self.service_id, self.status
        )
    }
}
