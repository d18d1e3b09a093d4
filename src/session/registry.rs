use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tracing::info;

use crate::cache::{self, Connection, Connector, Endpoint};

type Slot = Arc<OnceCell<Arc<dyn Connection>>>;

/// Established backend connections, one per tenant
///
/// A tenant's slot is inserted under the write lock with `entry()`, then
/// initialised once. Callers racing on an unseen tenant all land on the same
/// slot and wait for the same connect, so a tenant never gets two
/// connections. A failed connect leaves the slot empty for the next caller.
pub struct ConnectionRegistry {
    connector: Arc<dyn Connector>,
    connections: RwLock<HashMap<String, Slot>>,
}

impl ConnectionRegistry {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Existing connection for `tenant`, if one has been established
    pub async fn get(&self, tenant: &str) -> Option<Arc<dyn Connection>> {
        let connections = self.connections.read().await;
        connections.get(tenant).and_then(|slot| slot.get().cloned())
    }

    /// Existing connection for the endpoint's tenant, or a new one
    pub async fn get_or_connect(&self, endpoint: &Endpoint) -> cache::Result<Arc<dyn Connection>> {
        // Fast path: try read lock
        if let Some(connection) = self.get(&endpoint.name).await {
            return Ok(connection);
        }

        let slot = {
            let mut connections = self.connections.write().await;
            connections.entry(endpoint.name.clone()).or_default().clone()
        };

        let connection = slot
            .get_or_try_init(|| async {
                let connection = self.connector.connect(endpoint).await?;
                info!("Created connection for tenant {}", endpoint);
                Ok::<_, cache::CacheError>(connection)
            })
            .await?;

        Ok(connection.clone())
    }

    /// Tenant ids with an established connection
    pub async fn tenants(&self) -> Vec<String> {
        let connections = self.connections.read().await;
        let mut tenants: Vec<String> = connections
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(tenant, _)| tenant.clone())
            .collect();
        tenants.sort();
        tenants
    }

    /// Established connections, for health checks
    pub async fn connections(&self) -> Vec<Arc<dyn Connection>> {
        let connections = self.connections.read().await;
        connections.values().filter_map(|slot| slot.get().cloned()).collect()
    }

    pub async fn len(&self) -> usize {
        self.tenants().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Close and remove all connections (e.g., on shutdown)
    pub async fn close_all(&self) {
        let mut connections = self.connections.write().await;
        for (tenant, slot) in connections.drain() {
            if let Some(connection) = slot.get() {
                connection.close().await;
                info!("Closed connection for tenant: {}", tenant);
            }
        }
    }
}
