//! # Trading Data Adapter
//!
//! Single entry point owning one instance of each repository.
//!
//! [`TradingDataAdapter::new`] wires the in-memory reference engine.
//! [`TradingDataAdapter::builder`] swaps in other implementations and
//! attaches [`BackendProbe`]s, which stand in for the connection layer
//! when reporting health.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::application::TradingDataAdapter;
//! use trading_data_adapter::config::AdapterConfig;
//! use trading_data_adapter::infrastructure::persistence::CacheRepository;
//!
//! # tokio_test::block_on(async {
//! let adapter = TradingDataAdapter::new(AdapterConfig::default());
//! adapter.cache().set("greeting", "hello", None).await.unwrap();
//! assert_eq!(adapter.cache().get("greeting").await.unwrap().as_deref(), Some("hello"));
//!
//! let report = adapter.health_check().await;
//! assert!(report.is_healthy());
//! # });
//! ```

use super::error::AdapterResult;
use super::health::{BackendHealth, ConnectionStatus, HealthReport};
use crate::config::{AdapterConfig, StorageNames};
use crate::domain::value_objects::Timestamp;
use crate::infrastructure::persistence::in_memory::{
    InMemoryCacheRepository, InMemoryOrderRepository, InMemoryPositionRepository,
    InMemoryServiceDiscoveryRepository, InMemoryStrategyRepository, InMemoryTradeRepository,
};
use crate::infrastructure::persistence::{
    CacheRepository, OrderRepository, PositionRepository, RepositoryResult,
    ServiceDiscoveryRepository, StrategyRepository, TradeRepository,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Liveness check for one storage backend.
#[async_trait]
pub trait BackendProbe: Send + Sync + fmt::Debug {
    /// Backend name used in logs.
    fn name(&self) -> &str;

    /// Checks that the backend answers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Connection` when the backend is unreachable.
    async fn ping(&self) -> RepositoryResult<()>;
}

/// Facade over the six repositories.
#[derive(Debug)]
pub struct TradingDataAdapter {
    config: AdapterConfig,
    storage: StorageNames,
    strategies: Arc<dyn StrategyRepository>,
    orders: Arc<dyn OrderRepository>,
    trades: Arc<dyn TradeRepository>,
    positions: Arc<dyn PositionRepository>,
    service_discovery: Arc<dyn ServiceDiscoveryRepository>,
    cache: Arc<dyn CacheRepository>,
    postgres_probe: Option<Arc<dyn BackendProbe>>,
    redis_probe: Option<Arc<dyn BackendProbe>>,
    connection: RwLock<ConnectionStatus>,
}

impl TradingDataAdapter {
    /// Creates an adapter backed by the in-memory reference engine.
    #[must_use]
    pub fn new(config: AdapterConfig) -> Self {
        TradingDataAdapterBuilder::new(config).assemble()
    }

    /// Starts a builder for injecting repositories and probes.
    #[must_use]
    pub fn builder(config: AdapterConfig) -> TradingDataAdapterBuilder {
        TradingDataAdapterBuilder::new(config)
    }

    /// Adapter settings.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Schema and namespace owned by this instance.
    #[inline]
    #[must_use]
    pub fn storage_names(&self) -> &StorageNames {
        &self.storage
    }

    /// Strategy repository.
    #[must_use]
    pub fn strategies(&self) -> Arc<dyn StrategyRepository> {
        Arc::clone(&self.strategies)
    }

    /// Order repository.
    #[must_use]
    pub fn orders(&self) -> Arc<dyn OrderRepository> {
        Arc::clone(&self.orders)
    }

    /// Trade repository.
    #[must_use]
    pub fn trades(&self) -> Arc<dyn TradeRepository> {
        Arc::clone(&self.trades)
    }

    /// Position repository.
    #[must_use]
    pub fn positions(&self) -> Arc<dyn PositionRepository> {
        Arc::clone(&self.positions)
    }

    /// Service registry.
    #[must_use]
    pub fn service_discovery(&self) -> Arc<dyn ServiceDiscoveryRepository> {
        Arc::clone(&self.service_discovery)
    }

    /// Key/value cache.
    #[must_use]
    pub fn cache(&self) -> Arc<dyn CacheRepository> {
        Arc::clone(&self.cache)
    }

    /// Snapshot of the connection state.
    pub async fn connection_status(&self) -> ConnectionStatus {
        self.connection.read().await.clone()
    }

    /// Probes every configured backend and records the outcome.
    ///
    /// Failures are recorded, not returned; the adapter keeps serving
    /// from whatever repositories it holds.
    pub async fn connect(&self) -> ConnectionStatus {
        let postgres = self.probe(self.postgres_probe.as_ref()).await;
        let redis = self.probe(self.redis_probe.as_ref()).await;
        let now = Timestamp::now();

        let mut status = self.connection.write().await;
        status.postgres.record(&postgres, now);
        status.redis.record(&redis, now);
        info!(
            postgres_connected = status.postgres.connected,
            redis_connected = status.redis.connected,
            "adapter connected"
        );
        status.clone()
    }

    /// Marks every backend as disconnected.
    pub async fn disconnect(&self) {
        let mut status = self.connection.write().await;
        if status.postgres.connected {
            status.postgres.connected = false;
            info!("postgres connection closed");
        }
        if status.redis.connected {
            status.redis.connected = false;
            info!("redis connection closed");
        }
    }

    /// Probes every configured backend.
    ///
    /// Backends without a probe are reported as not connected and do not
    /// degrade the result.
    pub async fn health_check(&self) -> HealthReport {
        let postgres = self.probe(self.postgres_probe.as_ref()).await;
        let redis = self.probe(self.redis_probe.as_ref()).await;
        let report = HealthReport::new(postgres, redis, Timestamp::now());
        debug!(status = %report.status, "health check complete");
        report
    }

    async fn probe(&self, probe: Option<&Arc<dyn BackendProbe>>) -> BackendHealth {
        let Some(probe) = probe else {
            return BackendHealth::default();
        };
        let limit = self.config.health_check_timeout();
        match timeout(limit, probe.ping()).await {
            Ok(Ok(())) => BackendHealth::connected(),
            Ok(Err(e)) => {
                warn!(backend = probe.name(), error = %e, "backend probe failed");
                BackendHealth::failed(e.to_string())
            }
            Err(_) => {
                warn!(
                    backend = probe.name(),
                    timeout_secs = limit.as_secs(),
                    "backend probe timed out"
                );
                BackendHealth::failed(format!("timed out after {}s", limit.as_secs()))
            }
        }
    }
}

/// Builder for [`TradingDataAdapter`].
///
/// Repositories left unset fall back to the in-memory engine.
#[derive(Debug)]
#[must_use]
pub struct TradingDataAdapterBuilder {
    config: AdapterConfig,
    strategies: Option<Arc<dyn StrategyRepository>>,
    orders: Option<Arc<dyn OrderRepository>>,
    trades: Option<Arc<dyn TradeRepository>>,
    positions: Option<Arc<dyn PositionRepository>>,
    service_discovery: Option<Arc<dyn ServiceDiscoveryRepository>>,
    cache: Option<Arc<dyn CacheRepository>>,
    postgres_probe: Option<Arc<dyn BackendProbe>>,
    redis_probe: Option<Arc<dyn BackendProbe>>,
}

impl TradingDataAdapterBuilder {
    fn new(config: AdapterConfig) -> Self {
        Self {
            config,
            strategies: None,
            orders: None,
            trades: None,
            positions: None,
            service_discovery: None,
            cache: None,
            postgres_probe: None,
            redis_probe: None,
        }
    }

    /// Uses `repo` for strategies.
    pub fn strategies(mut self, repo: Arc<dyn StrategyRepository>) -> Self {
        self.strategies = Some(repo);
        self
    }

    /// Uses `repo` for orders.
    pub fn orders(mut self, repo: Arc<dyn OrderRepository>) -> Self {
        self.orders = Some(repo);
        self
    }

    /// Uses `repo` for trades.
    pub fn trades(mut self, repo: Arc<dyn TradeRepository>) -> Self {
        self.trades = Some(repo);
        self
    }

    /// Uses `repo` for positions.
    pub fn positions(mut self, repo: Arc<dyn PositionRepository>) -> Self {
        self.positions = Some(repo);
        self
    }

    /// Uses `repo` for service discovery.
    pub fn service_discovery(mut self, repo: Arc<dyn ServiceDiscoveryRepository>) -> Self {
        self.service_discovery = Some(repo);
        self
    }

    /// Uses `repo` for the cache.
    pub fn cache(mut self, repo: Arc<dyn CacheRepository>) -> Self {
        self.cache = Some(repo);
        self
    }

    /// Probe for the relational store.
    pub fn postgres_probe(mut self, probe: Arc<dyn BackendProbe>) -> Self {
        self.postgres_probe = Some(probe);
        self
    }

    /// Probe for the cache store.
    pub fn redis_probe(mut self, probe: Arc<dyn BackendProbe>) -> Self {
        self.redis_probe = Some(probe);
        self
    }

    /// Validates the configuration and builds the adapter.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Configuration` if the configuration is invalid.
    pub fn build(self) -> AdapterResult<TradingDataAdapter> {
        self.config.validate()?;
        Ok(self.assemble())
    }

    fn assemble(self) -> TradingDataAdapter {
        let storage = self.config.storage_names();
        info!(
            service_name = %self.config.service_name,
            instance = %storage.instance_name,
            schema = %storage.schema,
            namespace = %storage.namespace,
            version = %self.config.service_version,
            "initialized trading data adapter"
        );

        TradingDataAdapter {
            strategies: self
                .strategies
                .unwrap_or_else(|| Arc::new(InMemoryStrategyRepository::new())),
            orders: self
                .orders
                .unwrap_or_else(|| Arc::new(InMemoryOrderRepository::new())),
            trades: self
                .trades
                .unwrap_or_else(|| Arc::new(InMemoryTradeRepository::new())),
            positions: self
                .positions
                .unwrap_or_else(|| Arc::new(InMemoryPositionRepository::new())),
            service_discovery: self
                .service_discovery
                .unwrap_or_else(|| Arc::new(InMemoryServiceDiscoveryRepository::new())),
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(InMemoryCacheRepository::new())),
            postgres_probe: self.postgres_probe,
            redis_probe: self.redis_probe,
            connection: RwLock::new(ConnectionStatus::default()),
            storage,
            config: self.config,
        }
    }
}

/// Creates an adapter and runs [`TradingDataAdapter::connect`].
///
/// # Errors
///
/// Returns `AdapterError::Configuration` if the configuration is invalid.
pub async fn create_adapter(config: AdapterConfig) -> AdapterResult<TradingDataAdapter> {
    let adapter = TradingDataAdapter::builder(config).build()?;
    adapter.connect().await;
    Ok(adapter)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::Strategy;
    use crate::domain::value_objects::{StrategyId, StrategyStatus, StrategyType};
    use crate::infrastructure::persistence::RepositoryError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[derive(Debug)]
    struct FlakyProbe {
        name: &'static str,
        up: AtomicBool,
    }

    impl FlakyProbe {
        fn new(name: &'static str, up: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                up: AtomicBool::new(up),
            })
        }

        fn set_up(&self, up: bool) {
            self.up.store(up, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl BackendProbe for FlakyProbe {
        fn name(&self) -> &str {
            self.name
        }

        async fn ping(&self) -> RepositoryResult<()> {
            if self.up.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(RepositoryError::connection("connection refused"))
            }
        }
    }

    #[derive(Debug)]
    struct HangingProbe;

    #[async_trait]
    impl BackendProbe for HangingProbe {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn ping(&self) -> RepositoryResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    mod construction {
        use super::*;

        #[tokio::test]
        async fn repositories_are_shared_across_accessors() {
            let adapter = TradingDataAdapter::new(AdapterConfig::default());
            let strategy = Strategy::new(
                StrategyId::new("s-1"),
                "mm",
                StrategyType::MarketMaking,
                StrategyStatus::Active,
            )
            .unwrap();
            adapter.strategies().create(&strategy).await.unwrap();
            assert_eq!(
                adapter.strategies().get_by_id(strategy.strategy_id()).await.unwrap(),
                Some(strategy)
            );
        }

        #[tokio::test]
        async fn builder_injects_repositories() {
            let cache = Arc::new(InMemoryCacheRepository::new());
            cache.set("seed", "1", None).await.unwrap();
            let adapter = TradingDataAdapter::builder(AdapterConfig::default())
                .cache(cache)
                .build()
                .unwrap();
            assert_eq!(adapter.cache().get("seed").await.unwrap().as_deref(), Some("1"));
        }

        #[test]
        fn builder_rejects_invalid_config() {
            let config = AdapterConfig {
                service_name: String::new(),
                ..AdapterConfig::default()
            };
            let err = TradingDataAdapter::builder(config).build().unwrap_err();
            assert!(err.is_configuration());
        }

        #[test]
        fn storage_names_follow_config() {
            let config = AdapterConfig {
                service_instance_name: "trading-system-engine-LH".to_string(),
                ..AdapterConfig::default()
            };
            let adapter = TradingDataAdapter::new(config);
            assert_eq!(adapter.storage_names().schema, "trading_system_engine_lh");
            assert_eq!(adapter.storage_names().namespace, "trading_system:LH");
        }
    }

    mod connection {
        use super::*;

        #[tokio::test]
        async fn connect_records_each_backend() {
            let adapter = TradingDataAdapter::builder(AdapterConfig::default())
                .postgres_probe(FlakyProbe::new("postgres", true))
                .redis_probe(FlakyProbe::new("redis", false))
                .build()
                .unwrap();

            let status = adapter.connect().await;
            assert!(status.postgres.connected);
            assert!(status.postgres.last_check.is_some());
            assert!(!status.redis.connected);
            assert_eq!(status.redis.error.as_deref(), Some("Connection error: connection refused"));
            assert!(!status.all_connected());
        }

        #[tokio::test]
        async fn disconnect_clears_flags() {
            let adapter = TradingDataAdapter::builder(AdapterConfig::default())
                .postgres_probe(FlakyProbe::new("postgres", true))
                .redis_probe(FlakyProbe::new("redis", true))
                .build()
                .unwrap();
            assert!(adapter.connect().await.all_connected());

            adapter.disconnect().await;
            let status = adapter.connection_status().await;
            assert!(!status.postgres.connected);
            assert!(!status.redis.connected);
            assert!(status.redis.last_check.is_some());
        }

        #[tokio::test]
        async fn create_adapter_connects() {
            let adapter = create_adapter(AdapterConfig::default()).await.unwrap();
            let status = adapter.connection_status().await;
            assert!(!status.postgres.connected);
            assert!(status.postgres.error.is_none());
        }
    }

    mod health {
        use super::*;
        use crate::application::health::HealthStatus;

        #[tokio::test]
        async fn reference_engine_is_healthy() {
            let report = TradingDataAdapter::new(AdapterConfig::default())
                .health_check()
                .await;
            assert_eq!(report.status, HealthStatus::Healthy);
            assert!(!report.postgres.connected);
            assert!(!report.redis.connected);
        }

        #[tokio::test]
        async fn failing_probe_degrades() {
            let redis = FlakyProbe::new("redis", true);
            let adapter = TradingDataAdapter::builder(AdapterConfig::default())
                .postgres_probe(FlakyProbe::new("postgres", true))
                .redis_probe(redis.clone())
                .build()
                .unwrap();
            assert!(adapter.health_check().await.is_healthy());

            redis.set_up(false);
            let report = adapter.health_check().await;
            assert_eq!(report.status, HealthStatus::Degraded);
            assert!(report.postgres.connected);
            assert_eq!(report.degraded_backends(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn slow_probe_times_out() {
            let adapter = TradingDataAdapter::builder(AdapterConfig::default())
                .postgres_probe(Arc::new(HangingProbe))
                .build()
                .unwrap();
            let report = adapter.health_check().await;
            assert!(!report.is_healthy());
            assert_eq!(report.postgres.error.as_deref(), Some("timed out after 5s"));
        }
    }
}
