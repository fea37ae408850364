//! # In-Memory Trade Repository
//!
//! In-memory implementation of [`TradeRepository`].
//!
//! Aggregates are summed with overflow-checked decimal arithmetic.

use crate::domain::entities::Trade;
use crate::domain::queries::TradeQuery;
use crate::domain::value_objects::{OrderId, StrategyId, Timestamp, TradeId, checked_sum};
use crate::infrastructure::persistence::traits::{RepositoryResult, TradeRepository};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-memory implementation of [`TradeRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryTradeRepository {
    storage: Arc<RwLock<HashMap<TradeId, Trade>>>,
}

impl InMemoryTradeRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        info!("initialized in-memory trade repository");
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored trades.
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

    /// Removes every trade.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }

    /// Trades matching `predicate`, oldest execution first.
    async fn filtered<F>(&self, predicate: F) -> Vec<Trade>
    where
        F: Fn(&Trade) -> bool,
    {
        let storage = self.storage.read().await;
        let mut matches: Vec<Trade> = storage
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            (a.executed_at(), a.trade_id()).cmp(&(b.executed_at(), b.trade_id()))
        });
        matches
    }

    async fn strategy_trades(
        &self,
        strategy_id: &StrategyId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Vec<Trade> {
        self.filtered(|t| {
            t.strategy_id() == strategy_id && t.executed_at().is_within(from.as_ref(), to.as_ref())
        })
        .await
    }
}

impl Default for InMemoryTradeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TradeRepository for InMemoryTradeRepository {
    async fn create(&self, trade: &Trade) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert(trade.trade_id().clone(), trade.clone());
        debug!(trade_id = %trade.trade_id(), order_id = %trade.order_id(), "created trade");
        Ok(())
    }

    async fn get_by_id(&self, id: &TradeId) -> RepositoryResult<Option<Trade>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn delete(&self, id: &TradeId) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.remove(id).is_some() {
            debug!(trade_id = %id, "deleted trade");
        }
        Ok(())
    }

    async fn query(&self, query: &TradeQuery) -> RepositoryResult<Vec<Trade>> {
        let storage = self.storage.read().await;
        Ok(query.apply(storage.values().cloned().collect()))
    }

    async fn get_by_order(&self, order_id: &OrderId) -> RepositoryResult<Vec<Trade>> {
        Ok(self.filtered(|t| t.order_id() == order_id).await)
    }

    async fn get_by_strategy(
        &self,
        strategy_id: &StrategyId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> RepositoryResult<Vec<Trade>> {
        Ok(self.strategy_trades(strategy_id, from, to).await)
    }

    async fn get_by_instrument(
        &self,
        instrument_id: &str,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> RepositoryResult<Vec<Trade>> {
        Ok(self
            .filtered(|t| {
                t.instrument_id() == instrument_id
                    && t.executed_at().is_within(from.as_ref(), to.as_ref())
            })
            .await)
    }

    async fn get_daily_trades(
        &self,
        strategy_id: &StrategyId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Trade>> {
        Ok(self
            .filtered(|t| t.strategy_id() == strategy_id && t.executed_at().date() == date)
            .await)
    }

    async fn calculate_total_volume(
        &self,
        strategy_id: &StrategyId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> RepositoryResult<Decimal> {
        let trades = self.strategy_trades(strategy_id, from, to).await;
        Ok(checked_sum(trades.iter().map(Trade::gross_value))?)
    }

    async fn calculate_total_pnl(
        &self,
        strategy_id: &StrategyId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> RepositoryResult<Decimal> {
        let trades = self.strategy_trades(strategy_id, from, to).await;
        Ok(checked_sum(
            trades.iter().map(|t| t.realized_pnl().unwrap_or(Decimal::ZERO)),
        )?)
    }

    async fn get_by_exchange_trade_id(
        &self,
        exchange_trade_id: &str,
    ) -> RepositoryResult<Option<Trade>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .filter(|t| t.exchange_trade_id() == Some(exchange_trade_id))
            .min_by(|a, b| a.trade_id().cmp(b.trade_id()))
            .cloned())
    }

    async fn get_recent_trades(&self, limit: usize) -> RepositoryResult<Vec<Trade>> {
        let storage = self.storage.read().await;
        let mut trades: Vec<Trade> = storage.values().cloned().collect();
        trades.sort_by(|a, b| {
            (Reverse(a.executed_at()), a.trade_id()).cmp(&(Reverse(b.executed_at()), b.trade_id()))
        });
        trades.truncate(limit);
        Ok(trades)
    }
}
