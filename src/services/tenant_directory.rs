use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{self, Connection, Connector, Endpoint, TypedCache};
use crate::models::TenantMetaData;

/// Tenant id -> connection metadata, kept in a shared cache
///
/// Every user request reads through here, so nothing is cached locally:
/// an update made by another process is visible on the next request.
#[derive(Clone)]
pub struct TenantDirectory {
    connection: Arc<dyn Connection>,
    tenants: TypedCache<TenantMetaData>,
}

impl TenantDirectory {
    /// Wraps an existing connection, storing tenants in `cache_name`
    pub fn new(connection: Arc<dyn Connection>, cache_name: &str) -> Self {
        let tenants = cache::typed_cache(connection.as_ref(), cache_name);
        Self { connection, tenants }
    }

    /// Opens the directory connection through `connector`
    pub async fn connect(
        connector: &dyn Connector,
        endpoint: &Endpoint,
        cache_name: &str,
    ) -> cache::Result<Self> {
        let connection = connector.connect(endpoint).await?;
        info!("Tenant directory connected: {} (cache '{}')", endpoint, cache_name);
        Ok(Self::new(connection, cache_name))
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub async fn get(&self, tenant: &str) -> cache::Result<Option<TenantMetaData>> {
        self.tenants.get(tenant).await
    }

    /// Stores `meta` under its own tenant id, replacing any existing entry
    pub async fn put(&self, meta: &TenantMetaData) -> cache::Result<()> {
        debug!("Storing tenant '{}'", meta.tenant);
        self.tenants.put(&meta.tenant, meta).await
    }

    /// Removes a tenant, returning what was stored
    pub async fn remove(&self, tenant: &str) -> cache::Result<Option<TenantMetaData>> {
        debug!("Removing tenant '{}'", tenant);
        self.tenants.remove(tenant).await
    }
}
