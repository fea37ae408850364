//! # In-Memory Cache
//!
//! In-memory implementation of [`CacheRepository`] with lazy expiry.
//!
//! Each entry stores its value and an optional absolute expiry instant
//! computed once at write time. An entry is invisible from the instant it
//! expires. Expired entries are evicted by the next `get`, `exists`,
//! `keys`, `delete_pattern`, `expire` or `increment` that touches them;
//! nothing scans the map in the background.
//!
//! Time is read from [`tokio::time::Instant`], so tests can drive expiry
//! with a paused clock.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::infrastructure::persistence::in_memory::InMemoryCacheRepository;
//! use trading_data_adapter::infrastructure::persistence::traits::CacheRepository;
//!
//! # tokio_test::block_on(async {
//! let cache = InMemoryCacheRepository::new();
//! cache.set("counter", "10", None).await.unwrap();
//! assert_eq!(cache.increment("counter", 5).await.unwrap(), 15);
//! assert_eq!(cache.decrement("counter", 3).await.unwrap(), 12);
//! assert_eq!(cache.ttl("counter").await.unwrap(), -1);
//! # });
//! ```

use crate::domain::value_objects::{ArithmeticError, CheckedArithmetic};
use crate::infrastructure::persistence::in_memory::pattern::GlobPattern;
use crate::infrastructure::persistence::traits::{
    CacheRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

/// Returned by `ttl` for a key that is absent or expired.
pub const TTL_MISSING: i64 = -2;

/// Returned by `ttl` for a key without expiry.
pub const TTL_PERSISTENT: i64 = -1;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: String, ttl: Option<u64>, now: Instant) -> Self {
        Self {
            value,
            expires_at: expiry(ttl, now),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Absolute expiry for a TTL in seconds; `None` or zero never expires.
fn expiry(ttl: Option<u64>, now: Instant) -> Option<Instant> {
    ttl.filter(|&secs| secs > 0)
        .and_then(|secs| now.checked_add(Duration::from_secs(secs)))
}

fn compile(pattern: &str) -> RepositoryResult<GlobPattern> {
    GlobPattern::new(pattern)
        .map_err(|e| RepositoryError::query(format!("invalid key pattern {pattern:?}: {e}")))
}

/// Returns the live value for `key`, evicting it if expired.
fn live_value<'a>(
    entries: &'a mut HashMap<String, CacheEntry>,
    key: &str,
    now: Instant,
) -> Option<&'a mut CacheEntry> {
    if entries.get(key).is_some_and(|e| e.is_expired(now)) {
        entries.remove(key);
        debug!(key, "evicted expired cache entry");
        return None;
    }
    entries.get_mut(key)
}

/// Removes expired entries matching `pattern`, returning the live matches.
fn live_matches(
    entries: &mut HashMap<String, CacheEntry>,
    pattern: &GlobPattern,
    now: Instant,
) -> Vec<String> {
    let mut matched = Vec::new();
    entries.retain(|key, entry| {
        if !pattern.matches(key) {
            return true;
        }
        if entry.is_expired(now) {
            debug!(key = key.as_str(), "evicted expired cache entry");
            return false;
        }
        matched.push(key.clone());
        true
    });
    matched.sort();
    matched
}

/// In-memory implementation of [`CacheRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryCacheRepository {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCacheRepository {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        info!("initialized in-memory cache");
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl Default for InMemoryCacheRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheRepository for InMemoryCacheRepository {
    async fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let mut entries = self.entries.write().await;
        Ok(live_value(&mut entries, key, Instant::now()).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> RepositoryResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry::new(value.to_string(), ttl, Instant::now()),
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> RepositoryResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> RepositoryResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn get_json(&self, key: &str) -> RepositoryResult<Option<serde_json::Value>> {
        match self.get(key).await? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    async fn set_json(
        &self,
        key: &str,
        value: &serde_json::Value,
        ttl: Option<u64>,
    ) -> RepositoryResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw, ttl).await
    }

    async fn get_many(&self, keys: &[String]) -> RepositoryResult<Vec<Option<String>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }

    async fn set_many(
        &self,
        items: &HashMap<String, String>,
        ttl: Option<u64>,
    ) -> RepositoryResult<()> {
        for (key, value) in items {
            self.set(key, value, ttl).await?;
        }
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> RepositoryResult<u64> {
        let glob = compile(pattern)?;
        let mut entries = self.entries.write().await;
        let matched = live_matches(&mut entries, &glob, Instant::now());
        for key in &matched {
            entries.remove(key);
        }
        debug!(pattern, removed = matched.len(), "deleted cache keys by pattern");
        Ok(matched.len() as u64)
    }

    async fn keys(&self, pattern: &str) -> RepositoryResult<Vec<String>> {
        let glob = compile(pattern)?;
        let mut entries = self.entries.write().await;
        Ok(live_matches(&mut entries, &glob, Instant::now()))
    }

    async fn ttl(&self, key: &str) -> RepositoryResult<i64> {
        let entries = self.entries.read().await;
        let Some(entry) = entries.get(key) else {
            return Ok(TTL_MISSING);
        };
        let Some(expires_at) = entry.expires_at else {
            return Ok(TTL_PERSISTENT);
        };
        let remaining = expires_at.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(TTL_MISSING);
        }
        Ok(i64::try_from(remaining.as_secs()).unwrap_or(i64::MAX))
    }

    async fn expire(&self, key: &str, ttl: u64) -> RepositoryResult<()> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        if let Some(entry) = live_value(&mut entries, key, now) {
            // Zero expires the key at once.
            entry.expires_at = now.checked_add(Duration::from_secs(ttl));
        }
        Ok(())
    }

    async fn increment(&self, key: &str, amount: i64) -> RepositoryResult<i64> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let current = match live_value(&mut entries, key, now) {
            Some(entry) => entry.value.trim().parse::<i64>().map_err(|_| {
                RepositoryError::serialization(format!(
                    "value at {key:?} is not an integer: {:?}",
                    entry.value
                ))
            })?,
            None => 0,
        };
        let updated = current.safe_add(amount)?;
        entries.insert(
            key.to_string(),
            CacheEntry::new(updated.to_string(), None, now),
        );
        Ok(updated)
    }

    async fn decrement(&self, key: &str, amount: i64) -> RepositoryResult<i64> {
        let negated = amount.checked_neg().ok_or(ArithmeticError::Overflow)?;
        self.increment(key, negated).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::traits::CacheRepositoryExt;
    use serde_json::json;
    use tokio::time::advance;

    mod basic {
        use super::*;

        #[tokio::test]
        async fn set_get_delete() {
            let cache = InMemoryCacheRepository::new();
            cache.set("k", "v", None).await.unwrap();
            assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
            assert!(cache.exists("k").await.unwrap());
            cache.delete("k").await.unwrap();
            assert!(cache.get("k").await.unwrap().is_none());
            assert!(!cache.exists("k").await.unwrap());
        }

        #[tokio::test]
        async fn set_overwrites_value_and_expiry() {
            let cache = InMemoryCacheRepository::new();
            cache.set("k", "a", Some(60)).await.unwrap();
            cache.set("k", "b", None).await.unwrap();
            assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("b"));
            assert_eq!(cache.ttl("k").await.unwrap(), TTL_PERSISTENT);
        }

        #[tokio::test]
        async fn zero_ttl_never_expires() {
            let cache = InMemoryCacheRepository::new();
            cache.set("k", "v", Some(0)).await.unwrap();
            assert_eq!(cache.ttl("k").await.unwrap(), TTL_PERSISTENT);
        }

        #[tokio::test]
        async fn many_is_per_key() {
            let cache = InMemoryCacheRepository::new();
            let items = HashMap::from([
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]);
            cache.set_many(&items, None).await.unwrap();
            let values = cache
                .get_many(&["a".to_string(), "missing".to_string(), "b".to_string()])
                .await
                .unwrap();
            assert_eq!(values, vec![Some("1".to_string()), None, Some("2".to_string())]);
        }
    }

    mod expiry {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn ttl_counts_down_then_key_vanishes() {
            let cache = InMemoryCacheRepository::new();
            cache.set("k", "v", Some(2)).await.unwrap();
            let ttl = cache.ttl("k").await.unwrap();
            assert!((1..=2).contains(&ttl));

            advance(Duration::from_millis(1500)).await;
            assert_eq!(cache.ttl("k").await.unwrap(), 0);
            assert!(cache.exists("k").await.unwrap());

            advance(Duration::from_millis(500)).await;
            assert_eq!(cache.ttl("k").await.unwrap(), TTL_MISSING);
            assert!(cache.get("k").await.unwrap().is_none());
            assert!(!cache.exists("k").await.unwrap());
        }

        #[tokio::test(start_paused = true)]
        async fn ttl_does_not_evict_but_get_does() {
            let cache = InMemoryCacheRepository::new();
            cache.set("k", "v", Some(1)).await.unwrap();
            advance(Duration::from_secs(2)).await;
            assert_eq!(cache.ttl("k").await.unwrap(), TTL_MISSING);
            assert_eq!(cache.len(), 1);
            assert!(cache.get("k").await.unwrap().is_none());
            assert_eq!(cache.len(), 0);
        }

        #[tokio::test]
        async fn ttl_of_missing_key() {
            let cache = InMemoryCacheRepository::new();
            assert_eq!(cache.ttl("nope").await.unwrap(), TTL_MISSING);
        }

        #[tokio::test(start_paused = true)]
        async fn expire_applies_to_live_keys_only() {
            let cache = InMemoryCacheRepository::new();
            cache.set("k", "v", None).await.unwrap();
            cache.expire("k", 10).await.unwrap();
            assert_eq!(cache.ttl("k").await.unwrap(), 10);

            cache.expire("missing", 10).await.unwrap();
            assert!(cache.get("missing").await.unwrap().is_none());

            advance(Duration::from_secs(10)).await;
            assert!(cache.get("k").await.unwrap().is_none());
        }

        #[tokio::test(start_paused = true)]
        async fn expire_zero_removes_at_once() {
            let cache = InMemoryCacheRepository::new();
            cache.set("k", "v", None).await.unwrap();
            cache.expire("k", 0).await.unwrap();
            assert!(!cache.exists("k").await.unwrap());
        }
    }

    mod json_values {
        use super::*;

        #[tokio::test]
        async fn roundtrip_is_deep_equal() {
            let cache = InMemoryCacheRepository::new();
            let value = json!({"strategy": "mm", "spread": 0.001, "legs": [1, 2, {"x": null}]});
            cache.set_json("cfg", &value, None).await.unwrap();
            assert_eq!(cache.get_json("cfg").await.unwrap(), Some(value));
        }

        #[tokio::test]
        async fn non_json_is_serialization_error() {
            let cache = InMemoryCacheRepository::new();
            cache.set("raw", "not json", None).await.unwrap();
            assert!(cache.get_json("raw").await.unwrap_err().is_serialization());
        }

        #[tokio::test]
        async fn empty_string_reads_as_absent() {
            let cache = InMemoryCacheRepository::new();
            cache.set("blank", "", None).await.unwrap();
            assert!(cache.get_json("blank").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn typed_helpers() {
            let cache = InMemoryCacheRepository::new();
            cache
                .set_as("limits", &HashMap::from([("max".to_string(), 5_u32)]), None)
                .await
                .unwrap();
            let back: Option<HashMap<String, u32>> = cache.get_as("limits").await.unwrap();
            assert_eq!(back.unwrap().get("max"), Some(&5));
        }
    }

    mod patterns {
        use super::*;

        #[tokio::test]
        async fn delete_pattern_removes_matches() {
            let cache = InMemoryCacheRepository::new();
            for key in ["p:1", "p:2", "p:3", "q:1"] {
                cache.set(key, "v", None).await.unwrap();
            }
            assert_eq!(cache.delete_pattern("p:*").await.unwrap(), 3);
            assert!(cache.keys("p:*").await.unwrap().is_empty());
            assert_eq!(cache.keys("*").await.unwrap(), vec!["q:1".to_string()]);
        }

        #[tokio::test]
        async fn keys_are_sorted() {
            let cache = InMemoryCacheRepository::new();
            for key in ["user:2", "user:10", "user:1"] {
                cache.set(key, "v", None).await.unwrap();
            }
            assert_eq!(
                cache.keys("user:?").await.unwrap(),
                vec!["user:1".to_string(), "user:2".to_string()]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn expired_matches_are_evicted_not_counted() {
            let cache = InMemoryCacheRepository::new();
            cache.set("s:1", "v", Some(1)).await.unwrap();
            cache.set("s:2", "v", None).await.unwrap();
            advance(Duration::from_secs(1)).await;
            assert_eq!(cache.keys("s:*").await.unwrap(), vec!["s:2".to_string()]);
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.delete_pattern("s:*").await.unwrap(), 1);
        }
    }

    mod counters {
        use super::*;

        #[tokio::test]
        async fn increment_then_decrement() {
            let cache = InMemoryCacheRepository::new();
            cache.set("c", "10", None).await.unwrap();
            assert_eq!(cache.increment("c", 5).await.unwrap(), 15);
            assert_eq!(cache.decrement("c", 3).await.unwrap(), 12);
            assert_eq!(cache.get("c").await.unwrap().as_deref(), Some("12"));
        }

        #[tokio::test]
        async fn missing_counts_as_zero() {
            let cache = InMemoryCacheRepository::new();
            assert_eq!(cache.increment("fresh", 1).await.unwrap(), 1);
            assert_eq!(cache.decrement("other", 4).await.unwrap(), -4);
        }

        #[tokio::test]
        async fn increment_clears_expiry() {
            let cache = InMemoryCacheRepository::new();
            cache.set("c", "1", Some(60)).await.unwrap();
            cache.increment("c", 1).await.unwrap();
            assert_eq!(cache.ttl("c").await.unwrap(), TTL_PERSISTENT);
        }

        #[tokio::test]
        async fn non_integer_is_rejected() {
            let cache = InMemoryCacheRepository::new();
            cache.set("c", "1.5", None).await.unwrap();
            assert!(cache.increment("c", 1).await.unwrap_err().is_serialization());
            assert_eq!(cache.get("c").await.unwrap().as_deref(), Some("1.5"));
        }

        #[tokio::test]
        async fn overflow_is_reported() {
            let cache = InMemoryCacheRepository::new();
            cache.set("c", &i64::MAX.to_string(), None).await.unwrap();
            let err = cache.increment("c", 1).await.unwrap_err();
            assert!(matches!(err, RepositoryError::Arithmetic(_)));
        }
    }
}
