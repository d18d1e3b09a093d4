//! Client abstraction over the remote cache that backs tenants and users.
//!
//! A [`Connector`] turns an [`Endpoint`] into a live [`Connection`]; a
//! connection hands out [`NamedCache`]s, which are plain byte-level key/value
//! collections. [`TypedCache`] layers the connection's serializer format on top
//! so callers work with their own types.

pub mod codec;
pub mod memory;
pub mod redis_impl;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use codec::SerializerFormat;

use crate::models::TenantMetaData;

/// Errors raised by cache backends
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Connection to {endpoint} failed: {message}")]
    ConnectionFailed { endpoint: String, message: String },

    #[error("Connection to {0} timed out")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Where a connection points and how values on it are encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub serializer: SerializerFormat,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16, serializer: SerializerFormat) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            serializer,
        }
    }

    /// `host:port`, used to key shared backends and in log lines
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&TenantMetaData> for Endpoint {
    fn from(meta: &TenantMetaData) -> Self {
        Endpoint::new(
            meta.tenant.clone(),
            meta.host_name.clone(),
            meta.port,
            SerializerFormat::from_name(&meta.serializer),
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.address(), self.serializer)
    }
}

/// A named key/value collection reached through a connection
#[async_trait]
pub trait NamedCache: Send + Sync {
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes the key, returning the previous value in the same operation.
    async fn remove(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// A live handle to a cache endpoint
#[async_trait]
pub trait Connection: Send + Sync {
    fn endpoint(&self) -> &Endpoint;

    fn cache(&self, name: &str) -> Arc<dyn NamedCache>;

    async fn ping(&self) -> Result<()>;

    async fn close(&self);
}

/// Factory for connections; one call opens one connection
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn Connection>>;
}

/// Opens a named cache on `connection` using the connection's serializer
pub fn typed_cache<V>(connection: &dyn Connection, name: &str) -> TypedCache<V>
where
    V: Serialize + DeserializeOwned,
{
    TypedCache::new(connection.cache(name), connection.endpoint().serializer)
}

/// A [`NamedCache`] that encodes and decodes values of type `V`
pub struct TypedCache<V> {
    inner: Arc<dyn NamedCache>,
    format: SerializerFormat,
    _value: PhantomData<fn() -> V>,
}

impl<V> Clone for TypedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            format: self.format,
            _value: PhantomData,
        }
    }
}

impl<V> TypedCache<V>
where
    V: Serialize + DeserializeOwned,
{
    pub fn new(inner: Arc<dyn NamedCache>, format: SerializerFormat) -> Self {
        Self {
            inner,
            format,
            _value: PhantomData,
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<V>> {
        match self.inner.get(key).await? {
            Some(bytes) => Ok(Some(self.format.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn put(&self, key: &str, value: &V) -> Result<()> {
        let bytes = self.format.encode(value)?;
        self.inner.put(key, &bytes).await
    }

    pub async fn remove(&self, key: &str) -> Result<Option<V>> {
        match self.inner.remove(key).await? {
            Some(bytes) => Ok(Some(self.format.decode(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryConnector;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Widget {
        name: String,
        size: u32,
    }

    #[test]
    fn endpoint_from_tenant_metadata() {
        let meta = TenantMetaData {
            tenant: "acme".into(),
            host_name: "h1".into(),
            port: 1408,
            serializer: "YAML".into(),
            tenant_type: "gold".into(),
        };
        let endpoint = Endpoint::from(&meta);
        assert_eq!(endpoint.name, "acme");
        assert_eq!(endpoint.address(), "h1:1408");
        assert_eq!(endpoint.serializer, SerializerFormat::Yaml);
    }

    #[tokio::test]
    async fn typed_cache_encodes_with_connection_format() {
        let connector = MemoryConnector::new();
        let endpoint = Endpoint::new("t1", "localhost", 1408, SerializerFormat::Yaml);
        let connection = connector.connect(&endpoint).await.unwrap();

        let widgets: TypedCache<Widget> = typed_cache(connection.as_ref(), "widgets");
        let widget = Widget { name: "bolt".into(), size: 3 };
        widgets.put("w1", &widget).await.unwrap();

        let raw = connection.cache("widgets").get("w1").await.unwrap().unwrap();
        assert!(String::from_utf8(raw).unwrap().contains("name: bolt"));

        assert_eq!(widgets.get("w1").await.unwrap(), Some(widget));
        assert!(widgets.remove("w1").await.unwrap().is_some());
        assert_eq!(widgets.get("w1").await.unwrap(), None);
    }
}
