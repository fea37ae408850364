//! # Query Objects
//!
//! Filter, sort and page parameters accepted by each repository's `query`.
//!
//! Every field left as `None` matches everything. [`StrategyQuery::apply`]
//! and its siblings run the whole pipeline over an in-memory collection:
//! filter, sort by the chosen key with the entity ID as tie-break, then
//! page. Storage adapters with their own query language may translate the
//! same fields instead.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::domain::queries::{OrderQuery, OrderSortKey};
//! use trading_data_adapter::domain::value_objects::{OrderStatus, SortOrder};
//!
//! let query = OrderQuery {
//!     instrument_id: Some("BTC-USD".to_string()),
//!     status: Some(OrderStatus::Filled),
//!     sort_by: OrderSortKey::Quantity,
//!     sort_order: SortOrder::Asc,
//!     ..OrderQuery::default()
//! };
//! assert!(query.apply(Vec::new()).is_empty());
//! ```

use crate::domain::entities::{Order, Position, Strategy, Trade};
use crate::domain::value_objects::{
    OrderId, OrderSide, OrderStatus, OrderType, Pagination, SortOrder, StrategyId,
    StrategyStatus, StrategyType, Timestamp,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn in_range(value: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m)
}

fn sort_and_page<T, K, F>(mut items: Vec<T>, key: F, order: SortOrder, page: &Pagination) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.sort_by_key(key);
    if order == SortOrder::Desc {
        items.reverse();
    }
    page.apply(items)
}

/// Sort keys for [`StrategyQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategySortKey {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Last modification time.
    UpdatedAt,
    /// Display name.
    Name,
    /// Total P&L.
    TotalPnl,
}

/// Filters for strategies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyQuery {
    /// Only this classification.
    pub strategy_type: Option<StrategyType>,
    /// Only this status.
    pub status: Option<StrategyStatus>,
    /// Only strategies trading this instrument.
    pub instrument: Option<String>,
    /// Created at or after.
    pub from_date: Option<Timestamp>,
    /// Created at or before.
    pub to_date: Option<Timestamp>,
    /// Sort key.
    pub sort_by: StrategySortKey,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Page window.
    pub pagination: Pagination,
}

impl StrategyQuery {
    /// Returns true if `strategy` passes every populated filter.
    #[must_use]
    pub fn matches(&self, strategy: &Strategy) -> bool {
        self.strategy_type.is_none_or(|t| strategy.strategy_type() == t)
            && self.status.is_none_or(|s| strategy.status() == s)
            && self
                .instrument
                .as_deref()
                .is_none_or(|i| strategy.trades_instrument(i))
            && strategy
                .created_at()
                .is_within(self.from_date.as_ref(), self.to_date.as_ref())
    }

    /// Filters, sorts and pages `strategies`.
    #[must_use]
    pub fn apply(&self, strategies: Vec<Strategy>) -> Vec<Strategy> {
        let filtered: Vec<Strategy> = strategies.into_iter().filter(|s| self.matches(s)).collect();
        match self.sort_by {
            StrategySortKey::CreatedAt => sort_and_page(
                filtered,
                |s| (s.created_at(), s.strategy_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            StrategySortKey::UpdatedAt => sort_and_page(
                filtered,
                |s| (s.updated_at(), s.strategy_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            StrategySortKey::Name => sort_and_page(
                filtered,
                |s| (s.name().to_string(), s.strategy_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            StrategySortKey::TotalPnl => sort_and_page(
                filtered,
                |s| (s.total_pnl(), s.strategy_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
        }
    }
}

/// Sort keys for [`OrderQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortKey {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Last modification time.
    UpdatedAt,
    /// Ordered quantity.
    Quantity,
}

/// Filters for orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    /// Only orders of this strategy.
    pub strategy_id: Option<StrategyId>,
    /// Only this instrument.
    pub instrument_id: Option<String>,
    /// Only this side.
    pub side: Option<OrderSide>,
    /// Only this order type.
    pub order_type: Option<OrderType>,
    /// Only this status.
    pub status: Option<OrderStatus>,
    /// Created at or after.
    pub from_date: Option<Timestamp>,
    /// Created at or before.
    pub to_date: Option<Timestamp>,
    /// Sort key.
    pub sort_by: OrderSortKey,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Page window.
    pub pagination: Pagination,
}

impl OrderQuery {
    /// Returns true if `order` passes every populated filter.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        self.strategy_id
            .as_ref()
            .is_none_or(|id| order.strategy_id() == id)
            && self
                .instrument_id
                .as_deref()
                .is_none_or(|i| order.instrument_id() == i)
            && self.side.is_none_or(|s| order.side() == s)
            && self.order_type.is_none_or(|t| order.order_type() == t)
            && self.status.is_none_or(|s| order.status() == s)
            && order
                .created_at()
                .is_within(self.from_date.as_ref(), self.to_date.as_ref())
    }

    /// Filters, sorts and pages `orders`.
    #[must_use]
    pub fn apply(&self, orders: Vec<Order>) -> Vec<Order> {
        let filtered: Vec<Order> = orders.into_iter().filter(|o| self.matches(o)).collect();
        match self.sort_by {
            OrderSortKey::CreatedAt => sort_and_page(
                filtered,
                |o| (o.created_at(), o.order_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            OrderSortKey::UpdatedAt => sort_and_page(
                filtered,
                |o| (o.updated_at(), o.order_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            OrderSortKey::Quantity => sort_and_page(
                filtered,
                |o| (o.quantity(), o.order_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
        }
    }
}

/// Sort keys for [`TradeQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSortKey {
    /// Execution time.
    #[default]
    ExecutedAt,
    /// Gross value.
    GrossValue,
    /// Executed quantity.
    Quantity,
}

/// Filters for trades.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuery {
    /// Only trades of this strategy.
    pub strategy_id: Option<StrategyId>,
    /// Only fills of this order.
    pub order_id: Option<OrderId>,
    /// Only this instrument.
    pub instrument_id: Option<String>,
    /// Only this side.
    pub side: Option<OrderSide>,
    /// Only this venue.
    pub execution_venue: Option<String>,
    /// Executed at or after.
    pub from_date: Option<Timestamp>,
    /// Executed at or before.
    pub to_date: Option<Timestamp>,
    /// Minimum gross value.
    pub min_value: Option<Decimal>,
    /// Maximum gross value.
    pub max_value: Option<Decimal>,
    /// Sort key.
    pub sort_by: TradeSortKey,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Page window.
    pub pagination: Pagination,
}

impl TradeQuery {
    /// Returns true if `trade` passes every populated filter.
    #[must_use]
    pub fn matches(&self, trade: &Trade) -> bool {
        self.strategy_id
            .as_ref()
            .is_none_or(|id| trade.strategy_id() == id)
            && self.order_id.as_ref().is_none_or(|id| trade.order_id() == id)
            && self
                .instrument_id
                .as_deref()
                .is_none_or(|i| trade.instrument_id() == i)
            && self.side.is_none_or(|s| trade.side() == s)
            && self
                .execution_venue
                .as_deref()
                .is_none_or(|v| trade.execution_venue() == v)
            && trade
                .executed_at()
                .is_within(self.from_date.as_ref(), self.to_date.as_ref())
            && in_range(trade.gross_value(), self.min_value, self.max_value)
    }

    /// Filters, sorts and pages `trades`.
    #[must_use]
    pub fn apply(&self, trades: Vec<Trade>) -> Vec<Trade> {
        let filtered: Vec<Trade> = trades.into_iter().filter(|t| self.matches(t)).collect();
        match self.sort_by {
            TradeSortKey::ExecutedAt => sort_and_page(
                filtered,
                |t| (t.executed_at(), t.trade_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            TradeSortKey::GrossValue => sort_and_page(
                filtered,
                |t| (t.gross_value(), t.trade_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            TradeSortKey::Quantity => sort_and_page(
                filtered,
                |t| (t.quantity(), t.trade_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
        }
    }
}

/// Sort keys for [`PositionQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSortKey {
    /// Last market-data update.
    #[default]
    LastUpdated,
    /// Open time.
    OpenedAt,
    /// Exposure.
    Exposure,
    /// Unrealized P&L.
    UnrealizedPnl,
}

/// Filters for positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionQuery {
    /// Only positions of this strategy.
    pub strategy_id: Option<StrategyId>,
    /// Only this instrument.
    pub instrument_id: Option<String>,
    /// `Some(true)` for open only, `Some(false)` for closed only.
    pub is_open: Option<bool>,
    /// Opened at or after.
    pub from_date: Option<Timestamp>,
    /// Opened at or before.
    pub to_date: Option<Timestamp>,
    /// Minimum market value.
    pub min_value: Option<Decimal>,
    /// Maximum market value.
    pub max_value: Option<Decimal>,
    /// Sort key.
    pub sort_by: PositionSortKey,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Page window.
    pub pagination: Pagination,
}

impl PositionQuery {
    /// Returns true if `position` passes every populated filter.
    #[must_use]
    pub fn matches(&self, position: &Position) -> bool {
        self.strategy_id
            .as_ref()
            .is_none_or(|id| position.strategy_id() == id)
            && self
                .instrument_id
                .as_deref()
                .is_none_or(|i| position.instrument_id() == i)
            && self.is_open.is_none_or(|open| position.is_open() == open)
            && position
                .opened_at()
                .is_within(self.from_date.as_ref(), self.to_date.as_ref())
            && in_range(position.market_value(), self.min_value, self.max_value)
    }

    /// Filters, sorts and pages `positions`.
    #[must_use]
    pub fn apply(&self, positions: Vec<Position>) -> Vec<Position> {
        let filtered: Vec<Position> = positions.into_iter().filter(|p| self.matches(p)).collect();
        match self.sort_by {
            PositionSortKey::LastUpdated => sort_and_page(
                filtered,
                |p| (p.last_updated(), p.position_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            PositionSortKey::OpenedAt => sort_and_page(
                filtered,
                |p| (p.opened_at(), p.position_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            PositionSortKey::Exposure => sort_and_page(
                filtered,
                |p| (p.exposure(), p.position_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
            PositionSortKey::UnrealizedPnl => sort_and_page(
                filtered,
                |p| (p.unrealized_pnl(), p.position_id().clone()),
                self.sort_order,
                &self.pagination,
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{PositionId, TradeId};

    fn trade(id: &str, strategy: &str, secs: i64, qty: i64) -> Trade {
        Trade::new(
            TradeId::new(id),
            OrderId::new("ord-1"),
            StrategyId::new(strategy),
            "BTC-USD",
            OrderSide::Buy,
            Decimal::new(qty, 0),
            Decimal::new(100, 0),
            "sim",
            Timestamp::from_secs(1_700_000_000 + secs).unwrap(),
        )
        .unwrap()
    }

    mod trade_query {
        use super::*;

        #[test]
        fn empty_query_sorts_newest_first() {
            let trades = vec![trade("t1", "s1", 0, 1), trade("t2", "s1", 20, 1), trade("t3", "s1", 10, 1)];
            let ids: Vec<String> = TradeQuery::default()
                .apply(trades)
                .iter()
                .map(|t| t.trade_id().to_string())
                .collect();
            assert_eq!(ids, vec!["t2", "t3", "t1"]);
        }

        #[test]
        fn filters_combine() {
            let trades = vec![trade("t1", "s1", 0, 1), trade("t2", "s2", 0, 5), trade("t3", "s1", 0, 5)];
            let query = TradeQuery {
                strategy_id: Some(StrategyId::new("s1")),
                min_value: Some(Decimal::new(200, 0)),
                ..TradeQuery::default()
            };
            let result = query.apply(trades);
            assert_eq!(result.len(), 1);
            assert_eq!(result[0].trade_id().as_str(), "t3");
        }

        #[test]
        fn ties_break_on_id() {
            let trades = vec![trade("b", "s1", 0, 1), trade("a", "s1", 0, 1)];
            let query = TradeQuery {
                sort_order: SortOrder::Asc,
                ..TradeQuery::default()
            };
            let result = query.apply(trades);
            assert_eq!(result[0].trade_id().as_str(), "a");
        }

        #[test]
        fn pagination_windows_sorted_result() {
            let trades = (0..5).map(|i| trade(&format!("t{i}"), "s1", i, 1)).collect();
            let query = TradeQuery {
                sort_order: SortOrder::Asc,
                pagination: Pagination::new(2, 1).unwrap(),
                ..TradeQuery::default()
            };
            let ids: Vec<String> = query.apply(trades).iter().map(|t| t.trade_id().to_string()).collect();
            assert_eq!(ids, vec!["t1", "t2"]);
        }
    }

    mod position_query {
        use super::*;

        #[test]
        fn open_flag_filters_closed() {
            let open = Position::new(
                PositionId::new("p1"),
                StrategyId::new("s1"),
                "BTC-USD",
                Decimal::ONE,
                Decimal::ONE,
                Decimal::ONE,
                Timestamp::now(),
            )
            .unwrap();
            let mut closed = open.clone();
            closed.close(Timestamp::now());

            let only_closed = PositionQuery {
                is_open: Some(false),
                ..PositionQuery::default()
            };
            assert!(!only_closed.matches(&open));
            assert!(only_closed.matches(&closed));
            assert!(PositionQuery::default().matches(&open));
        }
    }
}
