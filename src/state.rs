use std::sync::Arc;

use tracing::info;

use crate::cache::memory::MemoryConnector;
use crate::cache::redis_impl::RedisConnector;
use crate::cache::{self, Connector};
use crate::config::{AppConfig, Backend};
use crate::health::{DirectoryCheck, HealthRegistry, TenantConnectionsCheck};
use crate::services::TenantDirectory;
use crate::session::{ConnectionRegistry, SessionResolver};

/// Everything a handler needs, owned by the application and shared by `Arc`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub directory: TenantDirectory,
    pub resolver: SessionResolver,
    pub health: Arc<HealthRegistry>,
}

impl AppState {
    /// Wires the directory, registry and health checks together
    pub async fn new(config: AppConfig, directory: TenantDirectory, connector: Arc<dyn Connector>) -> Self {
        let registry = Arc::new(ConnectionRegistry::new(connector));
        let resolver = SessionResolver::new(directory.clone(), registry.clone());

        let health = Arc::new(HealthRegistry::new());
        health.register(Arc::new(DirectoryCheck::new(directory.clone()))).await;
        health.register(Arc::new(TenantConnectionsCheck::new(registry))).await;

        Self {
            config: Arc::new(config),
            directory,
            resolver,
            health,
        }
    }

    /// Connects to the configured directory and builds the tenant connector
    pub async fn from_config(config: AppConfig) -> cache::Result<Self> {
        let memory = Arc::new(MemoryConnector::new());
        let directory_connector = connector_for(config.directory.backend, &config, &memory);
        let tenant_connector = connector_for(config.tenants.backend, &config, &memory);

        let directory = TenantDirectory::connect(
            directory_connector.as_ref(),
            &config.directory.endpoint(),
            &config.directory.cache_name,
        )
        .await?;

        info!(
            "Tenant connections use the {:?} backend (users cache '{}')",
            config.tenants.backend, config.tenants.users_cache
        );

        Ok(Self::new(config, directory, tenant_connector).await)
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        self.resolver.registry()
    }

    pub fn users_cache(&self) -> &str {
        &self.config.tenants.users_cache
    }

    /// Marks the runtime down and closes every tenant connection
    pub async fn shutdown(&self) {
        self.health.mark_stopped();
        self.registry().close_all().await;
        self.directory.connection().close().await;
        info!("Application state shut down");
    }
}

fn connector_for(backend: Backend, config: &AppConfig, memory: &Arc<MemoryConnector>) -> Arc<dyn Connector> {
    match backend {
        Backend::Memory => memory.clone() as Arc<dyn Connector>,
        Backend::Redis => Arc::new(RedisConnector::new(config.tenants.connect_timeout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_from_development_config() {
        let state = AppState::from_config(AppConfig::development()).await.unwrap();
        assert_eq!(state.users_cache(), "users");
        assert!(state.registry().is_empty().await);
        assert!(!state.health.is_started());
    }

    #[tokio::test]
    async fn shutdown_marks_runtime_down() {
        let state = AppState::from_config(AppConfig::development()).await.unwrap();
        state.health.mark_started();
        assert!(state.health.report().await.is_up());

        state.shutdown().await;
        assert!(!state.health.report().await.is_up());
    }
}
