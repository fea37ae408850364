//! # In-Memory Order Repository
//!
//! In-memory implementation of [`OrderRepository`].
//!
//! List operations return orders sorted by ID so results are stable
//! across runs.

use crate::domain::entities::Order;
use crate::domain::queries::OrderQuery;
use crate::domain::value_objects::{OrderId, OrderStatus, StrategyId, Timestamp};
use crate::infrastructure::persistence::traits::{OrderRepository, RepositoryResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-memory implementation of [`OrderRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryOrderRepository {
    storage: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        info!("initialized in-memory order repository");
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored orders.
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

    /// Removes every order.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Order>
    where
        F: Fn(&Order) -> bool,
    {
        let storage = self.storage.read().await;
        let mut matches: Vec<Order> = storage
            .values()
            .filter(|o| predicate(o))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.order_id().cmp(b.order_id()));
        matches
    }

    async fn modify<F>(&self, id: &OrderId, mutate: F)
    where
        F: FnOnce(&mut Order),
    {
        let mut storage = self.storage.write().await;
        match storage.get_mut(id) {
            Some(order) => mutate(order),
            None => debug!(order_id = %id, "order not found, ignoring mutation"),
        }
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert(order.order_id().clone(), order.clone());
        debug!(order_id = %order.order_id(), status = %order.status(), "created order");
        Ok(())
    }

    async fn get_by_id(&self, id: &OrderId) -> RepositoryResult<Option<Order>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn update(&self, order: &Order) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if let Some(stored) = storage.get_mut(order.order_id()) {
            *stored = order.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &OrderId) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.remove(id).is_some() {
            debug!(order_id = %id, "deleted order");
        }
        Ok(())
    }

    async fn query(&self, query: &OrderQuery) -> RepositoryResult<Vec<Order>> {
        let storage = self.storage.read().await;
        Ok(query.apply(storage.values().cloned().collect()))
    }

    async fn get_by_strategy(&self, strategy_id: &StrategyId) -> RepositoryResult<Vec<Order>> {
        Ok(self.filtered(|o| o.strategy_id() == strategy_id).await)
    }

    async fn get_active_orders(
        &self,
        strategy_id: Option<&StrategyId>,
    ) -> RepositoryResult<Vec<Order>> {
        Ok(self
            .filtered(|o| o.is_active() && strategy_id.is_none_or(|id| o.strategy_id() == id))
            .await)
    }

    async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        filled_quantity: Option<Decimal>,
    ) -> RepositoryResult<()> {
        self.modify(id, |o| {
            let now = Timestamp::now();
            o.set_status(status, now);
            if let Some(filled) = filled_quantity {
                o.set_filled_quantity(filled, now);
            }
        })
        .await;
        Ok(())
    }

    async fn update_fill(
        &self,
        id: &OrderId,
        filled_quantity: Decimal,
        average_price: Decimal,
    ) -> RepositoryResult<()> {
        self.modify(id, |o| {
            o.record_fill(filled_quantity, average_price, Timestamp::now());
        })
        .await;
        Ok(())
    }

    async fn cancel_order(&self, id: &OrderId, cancelled_at: Timestamp) -> RepositoryResult<()> {
        self.modify(id, |o| o.cancel(cancelled_at)).await;
        Ok(())
    }

    async fn get_by_exchange_order_id(
        &self,
        exchange_order_id: &str,
    ) -> RepositoryResult<Option<Order>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .filter(|o| o.exchange_order_id() == Some(exchange_order_id))
            .min_by(|a, b| a.order_id().cmp(b.order_id()))
            .cloned())
    }

    async fn get_orders_by_instrument(
        &self,
        instrument_id: &str,
        status: Option<OrderStatus>,
    ) -> RepositoryResult<Vec<Order>> {
        Ok(self
            .filtered(|o| {
                o.instrument_id() == instrument_id && status.is_none_or(|s| o.status() == s)
            })
            .await)
    }

    async fn get_pending_orders(&self) -> RepositoryResult<Vec<Order>> {
        Ok(self
            .filtered(|o| o.status() == OrderStatus::Pending)
            .await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{OrderSide, OrderType};

    fn order(id: &str, strategy: &str, status: OrderStatus) -> Order {
        Order::new(
            OrderId::new(id),
            StrategyId::new(strategy),
            "BTC-USD",
            OrderSide::Buy,
            OrderType::Limit,
            Decimal::ONE,
        )
        .unwrap()
        .with_price(Decimal::new(50000, 0))
        .with_status(status)
    }

    mod crud {
        use super::*;

        #[tokio::test]
        async fn create_then_get_returns_equal() {
            let repo = InMemoryOrderRepository::new();
            let o = order("ord-1", "s1", OrderStatus::Pending);
            repo.create(&o).await.unwrap();
            assert_eq!(repo.get_by_id(o.order_id()).await.unwrap(), Some(o));
        }

        #[tokio::test]
        async fn delete_then_get_is_none() {
            let repo = InMemoryOrderRepository::new();
            let o = order("ord-1", "s1", OrderStatus::Pending);
            repo.create(&o).await.unwrap();
            repo.delete(o.order_id()).await.unwrap();
            assert!(repo.get_by_id(o.order_id()).await.unwrap().is_none());
            assert!(repo.is_empty());
        }

        #[tokio::test]
        async fn update_of_unknown_id_is_ignored() {
            let repo = InMemoryOrderRepository::new();
            repo.update(&order("ord-1", "s1", OrderStatus::Filled))
                .await
                .unwrap();
            assert!(repo.is_empty());
        }
    }

    mod active_orders {
        use super::*;

        #[tokio::test]
        async fn returns_only_live_statuses() {
            let repo = InMemoryOrderRepository::new();
            let statuses = [
                OrderStatus::Pending,
                OrderStatus::Submitted,
                OrderStatus::PartiallyFilled,
                OrderStatus::Filled,
                OrderStatus::Cancelled,
            ];
            for (i, status) in statuses.into_iter().enumerate() {
                repo.create(&order(&format!("ord-{i}"), "s1", status))
                    .await
                    .unwrap();
            }
            let active = repo.get_active_orders(None).await.unwrap();
            let ids: Vec<&str> = active.iter().map(|o| o.order_id().as_str()).collect();
            assert_eq!(ids, vec!["ord-0", "ord-1", "ord-2"]);
        }

        #[tokio::test]
        async fn scoped_to_strategy() {
            let repo = InMemoryOrderRepository::new();
            repo.create(&order("a", "s1", OrderStatus::Accepted)).await.unwrap();
            repo.create(&order("b", "s2", OrderStatus::Accepted)).await.unwrap();
            let active = repo
                .get_active_orders(Some(&StrategyId::new("s2")))
                .await
                .unwrap();
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].order_id().as_str(), "b");
        }

        #[tokio::test]
        async fn pending_only() {
            let repo = InMemoryOrderRepository::new();
            repo.create(&order("a", "s1", OrderStatus::Pending)).await.unwrap();
            repo.create(&order("b", "s1", OrderStatus::Submitted)).await.unwrap();
            assert_eq!(repo.get_pending_orders().await.unwrap().len(), 1);
        }
    }

    mod mutations {
        use super::*;

        #[tokio::test]
        async fn cancel_sets_status_and_time() {
            let repo = InMemoryOrderRepository::new();
            let o = order("ord-1", "s1", OrderStatus::Submitted);
            repo.create(&o).await.unwrap();
            let at = Timestamp::from_ymd_hms(2025, 10, 3, 12, 0, 0).unwrap();
            repo.cancel_order(o.order_id(), at).await.unwrap();

            let stored = repo.get_by_id(o.order_id()).await.unwrap().unwrap();
            assert_eq!(stored.status(), OrderStatus::Cancelled);
            assert_eq!(stored.cancelled_at(), Some(at));
        }

        #[tokio::test]
        async fn cancel_unknown_is_ignored() {
            let repo = InMemoryOrderRepository::new();
            repo.cancel_order(&OrderId::new("ghost"), Timestamp::now())
                .await
                .unwrap();
            assert!(repo.is_empty());
        }

        #[tokio::test]
        async fn update_status_with_fill() {
            let repo = InMemoryOrderRepository::new();
            let o = order("ord-1", "s1", OrderStatus::Accepted);
            repo.create(&o).await.unwrap();
            repo.update_status(o.order_id(), OrderStatus::Filled, Some(Decimal::ONE))
                .await
                .unwrap();
            let stored = repo.get_by_id(o.order_id()).await.unwrap().unwrap();
            assert_eq!(stored.status(), OrderStatus::Filled);
            assert_eq!(stored.filled_quantity(), Decimal::ONE);
            assert!(stored.filled_at().is_some());
        }

        #[tokio::test]
        async fn update_fill_keeps_remaining() {
            let repo = InMemoryOrderRepository::new();
            let o = order("ord-1", "s1", OrderStatus::PartiallyFilled);
            repo.create(&o).await.unwrap();
            repo.update_fill(o.order_id(), Decimal::new(4, 1), Decimal::new(49990, 0))
                .await
                .unwrap();
            let stored = repo.get_by_id(o.order_id()).await.unwrap().unwrap();
            assert_eq!(stored.filled_quantity(), Decimal::new(4, 1));
            assert_eq!(stored.average_fill_price(), Some(Decimal::new(49990, 0)));
            assert_eq!(stored.remaining_quantity(), Decimal::ONE);
        }
    }

    mod lookups {
        use super::*;

        #[tokio::test]
        async fn by_exchange_order_id() {
            let repo = InMemoryOrderRepository::new();
            repo.create(&order("a", "s1", OrderStatus::Submitted).with_exchange_order_id("EX-1"))
                .await
                .unwrap();
            repo.create(&order("b", "s1", OrderStatus::Submitted))
                .await
                .unwrap();
            let found = repo.get_by_exchange_order_id("EX-1").await.unwrap().unwrap();
            assert_eq!(found.order_id().as_str(), "a");
            assert!(repo.get_by_exchange_order_id("EX-2").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn by_instrument_and_status() {
            let repo = InMemoryOrderRepository::new();
            repo.create(&order("a", "s1", OrderStatus::Filled)).await.unwrap();
            repo.create(&order("b", "s1", OrderStatus::Pending)).await.unwrap();
            assert_eq!(
                repo.get_orders_by_instrument("BTC-USD", None).await.unwrap().len(),
                2
            );
            assert_eq!(
                repo.get_orders_by_instrument("BTC-USD", Some(OrderStatus::Filled))
                    .await
                    .unwrap()
                    .len(),
                1
            );
            assert!(repo
                .get_orders_by_instrument("ETH-USD", None)
                .await
                .unwrap()
                .is_empty());
        }

        #[tokio::test]
        async fn by_strategy() {
            let repo = InMemoryOrderRepository::new();
            repo.create(&order("a", "s1", OrderStatus::Filled)).await.unwrap();
            repo.create(&order("b", "s2", OrderStatus::Pending)).await.unwrap();
            let orders = repo.get_by_strategy(&StrategyId::new("s1")).await.unwrap();
            assert_eq!(orders.len(), 1);
        }
    }
}
