//! # In-Memory Position Repository
//!
//! In-memory implementation of [`PositionRepository`].
//!
//! [`PositionRepository::update_market_data`] is the one operation that
//! recomputes derived fields; every other write stores the position as
//! given.

use crate::domain::entities::Position;
use crate::domain::queries::PositionQuery;
use crate::domain::value_objects::{PositionId, StrategyId, Timestamp, checked_sum};
use crate::infrastructure::persistence::traits::{PositionRepository, RepositoryResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// In-memory implementation of [`PositionRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryPositionRepository {
    storage: Arc<RwLock<HashMap<PositionId, Position>>>,
}

impl InMemoryPositionRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        info!("initialized in-memory position repository");
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored positions.
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

    /// Removes every position.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Position>
    where
        F: Fn(&Position) -> bool,
    {
        let storage = self.storage.read().await;
        let mut matches: Vec<Position> = storage
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.position_id().cmp(b.position_id()));
        matches
    }

    async fn open_positions(&self, strategy_id: Option<&StrategyId>) -> Vec<Position> {
        self.filtered(|p| p.is_open() && strategy_id.is_none_or(|id| p.strategy_id() == id))
            .await
    }
}

impl Default for InMemoryPositionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PositionRepository for InMemoryPositionRepository {
    async fn create(&self, position: &Position) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert(position.position_id().clone(), position.clone());
        debug!(position_id = %position.position_id(), "created position");
        Ok(())
    }

    async fn get_by_id(&self, id: &PositionId) -> RepositoryResult<Option<Position>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn update(&self, position: &Position) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if let Some(stored) = storage.get_mut(position.position_id()) {
            *stored = position.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &PositionId) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.remove(id).is_some() {
            debug!(position_id = %id, "deleted position");
        }
        Ok(())
    }

    async fn query(&self, query: &PositionQuery) -> RepositoryResult<Vec<Position>> {
        let storage = self.storage.read().await;
        Ok(query.apply(storage.values().cloned().collect()))
    }

    async fn get_by_strategy(&self, strategy_id: &StrategyId) -> RepositoryResult<Vec<Position>> {
        Ok(self.filtered(|p| p.strategy_id() == strategy_id).await)
    }

    async fn get_open_positions(
        &self,
        strategy_id: Option<&StrategyId>,
    ) -> RepositoryResult<Vec<Position>> {
        Ok(self.open_positions(strategy_id).await)
    }

    async fn get_by_instrument(
        &self,
        strategy_id: &StrategyId,
        instrument_id: &str,
    ) -> RepositoryResult<Option<Position>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .filter(|p| {
                p.is_open() && p.strategy_id() == strategy_id && p.instrument_id() == instrument_id
            })
            .min_by(|a, b| a.position_id().cmp(b.position_id()))
            .cloned())
    }

    async fn update_market_data(
        &self,
        id: &PositionId,
        current_price: Decimal,
    ) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        let Some(stored) = storage.get_mut(id) else {
            debug!(position_id = %id, "position not found, ignoring market data");
            return Ok(());
        };
        let mut repriced = stored.clone();
        if let Err(err) = repriced.reprice(current_price, Timestamp::now()) {
            warn!(position_id = %id, %current_price, error = %err, "failed to reprice position");
            return Err(err.into());
        }
        *stored = repriced;
        Ok(())
    }

    async fn close_position(&self, id: &PositionId, closed_at: Timestamp) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if let Some(position) = storage.get_mut(id) {
            position.close(closed_at);
            debug!(position_id = %id, "closed position");
        }
        Ok(())
    }

    async fn calculate_total_exposure(
        &self,
        strategy_id: Option<&StrategyId>,
    ) -> RepositoryResult<Decimal> {
        let open = self.open_positions(strategy_id).await;
        Ok(checked_sum(open.iter().map(Position::exposure))?)
    }

    async fn calculate_total_unrealized_pnl(
        &self,
        strategy_id: Option<&StrategyId>,
    ) -> RepositoryResult<Decimal> {
        let open = self.open_positions(strategy_id).await;
        Ok(checked_sum(open.iter().map(Position::unrealized_pnl))?)
    }

    async fn get_largest_positions(&self, limit: usize) -> RepositoryResult<Vec<Position>> {
        let storage = self.storage.read().await;
        let mut positions: Vec<Position> = storage.values().cloned().collect();
        positions.sort_by(|a, b| {
            (Reverse(a.exposure().abs()), a.position_id())
                .cmp(&(Reverse(b.exposure().abs()), b.position_id()))
        });
        positions.truncate(limit);
        Ok(positions)
    }
}
