//! # In-Memory Service Registry
//!
//! In-memory implementation of [`ServiceDiscoveryRepository`].
//!
//! Stale entries are removed only when
//! [`ServiceDiscoveryRepository::cleanup_stale_services`] is called; there
//! is no background sweeper.

use crate::domain::entities::ServiceInfo;
use crate::domain::value_objects::{ServiceId, Timestamp};
use crate::infrastructure::persistence::traits::{RepositoryResult, ServiceDiscoveryRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-memory implementation of [`ServiceDiscoveryRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryServiceDiscoveryRepository {
    services: Arc<RwLock<HashMap<ServiceId, ServiceInfo>>>,
}

impl InMemoryServiceDiscoveryRepository {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        info!("initialized in-memory service registry");
        Self {
            services: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn sorted<F>(&self, predicate: F) -> Vec<ServiceInfo>
    where
        F: Fn(&ServiceInfo) -> bool,
    {
        let services = self.services.read().await;
        let mut matches: Vec<ServiceInfo> = services
            .values()
            .filter(|s| predicate(s))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.service_id().cmp(b.service_id()));
        matches
    }
}

impl Default for InMemoryServiceDiscoveryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceDiscoveryRepository for InMemoryServiceDiscoveryRepository {
    async fn register(&self, service: &ServiceInfo) -> RepositoryResult<()> {
        let mut services = self.services.write().await;
        services.insert(service.service_id().clone(), service.clone());
        info!(
            service_id = %service.service_id(),
            service_name = service.service_name(),
            "registered service"
        );
        Ok(())
    }

    async fn deregister(&self, id: &ServiceId) -> RepositoryResult<()> {
        let mut services = self.services.write().await;
        if services.remove(id).is_some() {
            info!(service_id = %id, "deregistered service");
        }
        Ok(())
    }

    async fn update_heartbeat(&self, id: &ServiceId) -> RepositoryResult<()> {
        let mut services = self.services.write().await;
        if let Some(service) = services.get_mut(id) {
            service.heartbeat(Timestamp::now());
        }
        Ok(())
    }

    async fn get_service(&self, service_name: &str) -> RepositoryResult<Option<ServiceInfo>> {
        let services = self.services.read().await;
        Ok(services
            .values()
            .filter(|s| s.service_name() == service_name)
            .min_by(|a, b| {
                (a.registered_at(), a.service_id()).cmp(&(b.registered_at(), b.service_id()))
            })
            .cloned())
    }

    async fn get_service_by_id(&self, id: &ServiceId) -> RepositoryResult<Option<ServiceInfo>> {
        let services = self.services.read().await;
        Ok(services.get(id).cloned())
    }

    async fn list_services(&self) -> RepositoryResult<Vec<ServiceInfo>> {
        Ok(self.sorted(|_| true).await)
    }

    async fn list_healthy_services(&self) -> RepositoryResult<Vec<ServiceInfo>> {
        Ok(self.sorted(ServiceInfo::is_healthy).await)
    }

    async fn cleanup_stale_services(&self, threshold_secs: u64) -> RepositoryResult<u64> {
        let now = Timestamp::now();
        let mut services = self.services.write().await;
        let before = services.len();
        services.retain(|id, service| {
            let stale = service.is_stale(now, threshold_secs);
            if stale {
                debug!(service_id = %id, last_seen = %service.last_seen(), "removing stale service");
            }
            !stale
        });
        let removed = before.saturating_sub(services.len()) as u64;
        if removed > 0 {
            info!(removed, threshold_secs, "cleaned up stale services");
        }
        Ok(removed)
    }

    async fn update_status(&self, id: &ServiceId, status: &str) -> RepositoryResult<()> {
        let mut services = self.services.write().await;
        if let Some(service) = services.get_mut(id) {
            service.set_status(status);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(id: &str, name: &str) -> ServiceInfo {
        ServiceInfo::new(ServiceId::new(id), name, "1.0.0", "localhost", 50051, 8080).unwrap()
    }

    mod registration {
        use super::*;

        #[tokio::test]
        async fn register_then_get_by_id() {
            let repo = InMemoryServiceDiscoveryRepository::new();
            let s = service("svc-1", "trading-system-engine");
            repo.register(&s).await.unwrap();
            assert_eq!(repo.get_service_by_id(s.service_id()).await.unwrap(), Some(s));
        }

        #[tokio::test]
        async fn register_overwrites_same_id() {
            let repo = InMemoryServiceDiscoveryRepository::new();
            repo.register(&service("svc-1", "a")).await.unwrap();
            repo.register(&service("svc-1", "b")).await.unwrap();
            assert_eq!(repo.len(), 1);
            let stored = repo
                .get_service_by_id(&ServiceId::new("svc-1"))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.service_name(), "b");
        }

        #[tokio::test]
        async fn deregister_removes() {
            let repo = InMemoryServiceDiscoveryRepository::new();
            repo.register(&service("svc-1", "a")).await.unwrap();
            repo.deregister(&ServiceId::new("svc-1")).await.unwrap();
            repo.deregister(&ServiceId::new("svc-1")).await.unwrap();
            assert!(repo.is_empty());
        }

        #[tokio::test]
        async fn get_service_prefers_earliest_registration() {
            let repo = InMemoryServiceDiscoveryRepository::new();
            let t0 = Timestamp::now().sub_secs(60);
            repo.register(&service("svc-b", "engine").with_registered_at(t0))
                .await
                .unwrap();
            repo.register(&service("svc-a", "engine").with_registered_at(t0.add_secs(10)))
                .await
                .unwrap();
            let found = repo.get_service("engine").await.unwrap().unwrap();
            assert_eq!(found.service_id().as_str(), "svc-b");
            assert!(repo.get_service("other").await.unwrap().is_none());
        }
    }

    mod health {
        use super::*;

        #[tokio::test]
        async fn healthy_filter_is_exact() {
            let repo = InMemoryServiceDiscoveryRepository::new();
            repo.register(&service("a", "x")).await.unwrap();
            repo.register(&service("b", "x").with_status("degraded"))
                .await
                .unwrap();
            repo.register(&service("c", "x").with_status("HEALTHY"))
                .await
                .unwrap();
            let healthy = repo.list_healthy_services().await.unwrap();
            assert_eq!(healthy.len(), 1);
            assert_eq!(healthy[0].service_id().as_str(), "a");
            assert_eq!(repo.list_services().await.unwrap().len(), 3);
        }

        #[tokio::test]
        async fn update_status_changes_health() {
            let repo = InMemoryServiceDiscoveryRepository::new();
            repo.register(&service("a", "x")).await.unwrap();
            repo.update_status(&ServiceId::new("a"), "unhealthy")
                .await
                .unwrap();
            assert!(repo.list_healthy_services().await.unwrap().is_empty());
        }
    }

    mod heartbeats {
        use super::*;

        #[tokio::test]
        async fn cleanup_removes_only_stale() {
            let repo = InMemoryServiceDiscoveryRepository::new();
            let now = Timestamp::now();
            repo.register(&service("old", "x").with_registered_at(now.sub_secs(400)))
                .await
                .unwrap();
            repo.register(&service("fresh", "x").with_registered_at(now.sub_secs(100)))
                .await
                .unwrap();
            assert_eq!(repo.cleanup_stale_services(300).await.unwrap(), 1);
            assert!(
                repo.get_service_by_id(&ServiceId::new("old"))
                    .await
                    .unwrap()
                    .is_none()
            );
            assert_eq!(repo.len(), 1);
        }

        #[tokio::test]
        async fn heartbeat_rescues_service() {
            let repo = InMemoryServiceDiscoveryRepository::new();
            let id = ServiceId::new("svc");
            repo.register(&service("svc", "x").with_registered_at(Timestamp::now().sub_secs(400)))
                .await
                .unwrap();
            repo.update_heartbeat(&id).await.unwrap();
            assert_eq!(repo.cleanup_stale_services(300).await.unwrap(), 0);

            let stored = repo.get_service_by_id(&id).await.unwrap().unwrap();
            assert!(stored.last_seen().is_after(&stored.registered_at()));
        }

        #[tokio::test]
        async fn cleanup_on_empty_registry() {
            let repo = InMemoryServiceDiscoveryRepository::new();
            assert_eq!(repo.cleanup_stale_services(0).await.unwrap(), 0);
        }
    }
}
