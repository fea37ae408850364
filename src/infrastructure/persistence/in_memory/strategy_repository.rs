//! # In-Memory Strategy Repository
//!
//! In-memory implementation of [`StrategyRepository`].
//!
//! This implementation uses a thread-safe `HashMap` for storage, making it
//! suitable for unit tests and for degraded operation without a database.

use crate::domain::entities::Strategy;
use crate::domain::queries::StrategyQuery;
use crate::domain::value_objects::{StrategyId, StrategyStatus, StrategyType, Timestamp};
use crate::infrastructure::persistence::traits::{RepositoryResult, StrategyRepository};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-memory implementation of [`StrategyRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryStrategyRepository {
    storage: Arc<RwLock<HashMap<StrategyId, Strategy>>>,
}

impl InMemoryStrategyRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        info!("initialized in-memory strategy repository");
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every strategy.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Strategy>
    where
        F: Fn(&Strategy) -> bool,
    {
        let storage = self.storage.read().await;
        let mut matches: Vec<Strategy> = storage
            .values()
            .filter(|s| predicate(s))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.strategy_id().cmp(b.strategy_id()));
        matches
    }

    async fn modify<F>(&self, id: &StrategyId, mutate: F)
    where
        F: FnOnce(&mut Strategy),
    {
        let mut storage = self.storage.write().await;
        match storage.get_mut(id) {
            Some(strategy) => mutate(strategy),
            None => debug!(strategy_id = %id, "strategy not found, ignoring mutation"),
        }
    }
}

impl Default for InMemoryStrategyRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StrategyRepository for InMemoryStrategyRepository {
    async fn create(&self, strategy: &Strategy) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert(strategy.strategy_id().clone(), strategy.clone());
        debug!(strategy_id = %strategy.strategy_id(), "created strategy");
        Ok(())
    }

    async fn get_by_id(&self, id: &StrategyId) -> RepositoryResult<Option<Strategy>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn update(&self, strategy: &Strategy) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if let Some(stored) = storage.get_mut(strategy.strategy_id()) {
            *stored = strategy.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &StrategyId) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.remove(id).is_some() {
            debug!(strategy_id = %id, "deleted strategy");
        }
        Ok(())
    }

    async fn query(&self, query: &StrategyQuery) -> RepositoryResult<Vec<Strategy>> {
        let storage = self.storage.read().await;
        Ok(query.apply(storage.values().cloned().collect()))
    }

    async fn get_active_strategies(&self) -> RepositoryResult<Vec<Strategy>> {
        Ok(self.filtered(|s| s.status().is_running()).await)
    }

    async fn update_status(&self, id: &StrategyId, status: StrategyStatus) -> RepositoryResult<()> {
        self.modify(id, |s| s.set_status(status, Timestamp::now()))
            .await;
        Ok(())
    }

    async fn update_pnl(
        &self,
        id: &StrategyId,
        total_pnl: Decimal,
        daily_pnl: Decimal,
    ) -> RepositoryResult<()> {
        self.modify(id, |s| s.set_pnl(total_pnl, daily_pnl, Timestamp::now()))
            .await;
        Ok(())
    }

    async fn increment_trade_count(&self, id: &StrategyId) -> RepositoryResult<()> {
        self.modify(id, |s| s.record_trade(Timestamp::now())).await;
        Ok(())
    }

    async fn get_by_instrument(&self, instrument_id: &str) -> RepositoryResult<Vec<Strategy>> {
        Ok(self.filtered(|s| s.trades_instrument(instrument_id)).await)
    }

    async fn get_by_type(&self, strategy_type: StrategyType) -> RepositoryResult<Vec<Strategy>> {
        Ok(self
            .filtered(|s| s.strategy_type() == strategy_type)
            .await)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}
