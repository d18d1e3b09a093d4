//! Redis cache backend.
//!
//! One `ConnectionManager` per connection; it reconnects on its own, so a
//! handle stays usable for the lifetime of the process. A named cache is a
//! key prefix: entry `k` of cache `users` is stored under `users:k`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use super::{CacheError, Connection, Connector, Endpoint, NamedCache, Result};

/// Maps Redis errors to CacheError
fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::ConnectionFailed {
            endpoint: "redis".to_string(),
            message: err.to_string(),
        }
    } else {
        CacheError::Backend(err.to_string())
    }
}

/// Builds `redis://host:port/`, rejecting hosts that do not form a valid URL
fn redis_url(endpoint: &Endpoint) -> Result<String> {
    if endpoint.host.trim().is_empty() {
        return Err(CacheError::InvalidEndpoint(format!("tenant '{}' has no host name", endpoint.name)));
    }
    if endpoint.port == 0 {
        return Err(CacheError::InvalidEndpoint(format!("tenant '{}' has no port", endpoint.name)));
    }

    let url = url::Url::parse(&format!("redis://{}:{}/", endpoint.host, endpoint.port))
        .map_err(|e| CacheError::InvalidEndpoint(format!("{}: {}", endpoint.address(), e)))?;
    Ok(url.into())
}

/// Connector opening one managed Redis connection per call
#[derive(Debug, Clone)]
pub struct RedisConnector {
    connect_timeout: Duration,
}

impl RedisConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl Connector for RedisConnector {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn Connection>> {
        let url = redis_url(endpoint)?;
        let client = redis::Client::open(url.as_str()).map_err(|e| CacheError::InvalidEndpoint(e.to_string()))?;

        let manager = tokio::time::timeout(self.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(endpoint.address()))?
            .map_err(|e| CacheError::ConnectionFailed {
                endpoint: endpoint.address(),
                message: e.to_string(),
            })?;

        info!("Connected to redis for {}", endpoint);
        Ok(Arc::new(RedisConnection {
            endpoint: endpoint.clone(),
            manager,
        }))
    }
}

pub struct RedisConnection {
    endpoint: Endpoint,
    manager: ConnectionManager,
}

#[async_trait]
impl Connection for RedisConnection {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn cache(&self, name: &str) -> Arc<dyn NamedCache> {
        Arc::new(RedisCache {
            name: name.to_string(),
            manager: self.manager.clone(),
        })
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(())
    }

    /// Release hint only. The socket belongs to the `ConnectionManager` and
    /// closes when its last clone drops, so a session still holding this
    /// connection keeps it open until the request finishes.
    async fn close(&self) {
        info!("Releasing redis connection for {}", self.endpoint);
    }
}

struct RedisCache {
    name: String,
    manager: ConnectionManager,
}

impl RedisCache {
    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.name, key)
    }
}

#[async_trait]
impl NamedCache for RedisCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = conn.get(self.key(key)).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.set(self.key(key), value).await.map_err(map_redis_error)?;
        Ok(())
    }

    // GETDEL keeps read-and-remove a single server-side operation
    async fn remove(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = conn.get_del(self.key(key)).await.map_err(map_redis_error)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SerializerFormat;

    #[test]
    fn builds_redis_url_from_endpoint() {
        let endpoint = Endpoint::new("acme", "cache.internal", 6380, SerializerFormat::Json);
        assert_eq!(redis_url(&endpoint).unwrap(), "redis://cache.internal:6380/");
    }

    #[test]
    fn rejects_blank_host_and_zero_port() {
        let blank = Endpoint::new("acme", "  ", 6379, SerializerFormat::Json);
        assert!(matches!(redis_url(&blank), Err(CacheError::InvalidEndpoint(_))));

        let no_port = Endpoint::new("acme", "localhost", 0, SerializerFormat::Json);
        assert!(matches!(redis_url(&no_port), Err(CacheError::InvalidEndpoint(_))));
    }

    #[test]
    fn rejects_hosts_that_break_the_url() {
        let endpoint = Endpoint::new("acme", "bad host/name", 6379, SerializerFormat::Json);
        assert!(matches!(redis_url(&endpoint), Err(CacheError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn unreachable_server_fails_or_times_out() {
        // Port 1 on loopback is never a redis server
        let connector = RedisConnector::new(Duration::from_millis(500));
        let endpoint = Endpoint::new("acme", "127.0.0.1", 1, SerializerFormat::Json);
        let err = connector.connect(&endpoint).await.err().unwrap();
        assert!(matches!(err, CacheError::ConnectionFailed { .. } | CacheError::Timeout(_)));
    }
}
