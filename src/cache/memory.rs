//! In-process cache backend.
//!
//! Every connection to the same `host:port` shares one store, the way two
//! clients of one cluster see the same data. Used when no external cache is
//! configured and throughout the test suite.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{CacheError, Connection, Connector, Endpoint, NamedCache, Result};

/// Data held for one endpoint: cache name -> key -> encoded value
#[derive(Debug, Default)]
struct MemoryStore {
    caches: RwLock<HashMap<String, HashMap<String, Vec<u8>>>>,
}

/// Connector producing [`MemoryConnection`]s
#[derive(Debug, Default)]
pub struct MemoryConnector {
    stores: RwLock<HashMap<String, Arc<MemoryStore>>>,
    refused: RwLock<HashSet<String>>,
    connects: AtomicUsize,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connections opened so far
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Makes `address` (`host:port`) refuse new connections
    pub async fn refuse(&self, address: impl Into<String>) {
        self.refused.write().await.insert(address.into());
    }

    /// Lets `address` accept connections again
    pub async fn accept(&self, address: &str) {
        self.refused.write().await.remove(address);
    }

    async fn store_for(&self, address: &str) -> Arc<MemoryStore> {
        {
            let stores = self.stores.read().await;
            if let Some(store) = stores.get(address) {
                return store.clone();
            }
        }

        let mut stores = self.stores.write().await;
        stores.entry(address.to_string()).or_default().clone()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn Connection>> {
        let address = endpoint.address();
        if self.refused.read().await.contains(&address) {
            return Err(CacheError::ConnectionFailed {
                endpoint: address,
                message: "connection refused".to_string(),
            });
        }

        let store = self.store_for(&address).await;
        self.connects.fetch_add(1, Ordering::SeqCst);
        debug!("Opened in-memory connection for {}", endpoint);

        Ok(Arc::new(MemoryConnection {
            endpoint: endpoint.clone(),
            store,
            closed: Arc::new(AtomicBool::new(false)),
        }))
    }
}

/// Connection to an in-process store
#[derive(Debug)]
pub struct MemoryConnection {
    endpoint: Endpoint,
    store: Arc<MemoryStore>,
    closed: Arc<AtomicBool>,
}

impl MemoryConnection {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn cache(&self, name: &str) -> Arc<dyn NamedCache> {
        Arc::new(MemoryCache {
            name: name.to_string(),
            store: self.store.clone(),
            closed: self.closed.clone(),
        })
    }

    async fn ping(&self) -> Result<()> {
        if self.is_closed() {
            return Err(CacheError::Backend(format!("connection to {} is closed", self.endpoint.address())));
        }
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

struct MemoryCache {
    name: String,
    store: Arc<MemoryStore>,
    closed: Arc<AtomicBool>,
}

impl MemoryCache {
    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CacheError::Backend(format!("cache '{}' used after close", self.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl NamedCache for MemoryCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        let caches = self.store.caches.read().await;
        Ok(caches.get(&self.name).and_then(|entries| entries.get(key)).cloned())
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.ensure_open()?;
        let mut caches = self.store.caches.write().await;
        caches
            .entry(self.name.clone())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        let mut caches = self.store.caches.write().await;
        Ok(caches.get_mut(&self.name).and_then(|entries| entries.remove(key)))
    }
}
