use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::registry::ConnectionRegistry;
use crate::cache::{self, CacheError, Connection, Endpoint, TypedCache};
use crate::services::TenantDirectory;

/// Errors from resolving a tenant to its connection
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unknown tenant identifier \"{0}\"")]
    TenantNotFound(String),

    #[error(transparent)]
    Backend(#[from] CacheError),
}

/// A tenant's live connection, as handed to a request
#[derive(Clone)]
pub struct Session {
    connection: Arc<dyn Connection>,
}

impl Session {
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Named cache on this tenant's connection
    pub fn cache<V>(&self, name: &str) -> TypedCache<V>
    where
        V: Serialize + DeserializeOwned,
    {
        cache::typed_cache(self.connection.as_ref(), name)
    }
}

/// Turns a tenant id into a [`Session`]
///
/// The directory is read on every call, so a deleted tenant stops resolving
/// straight away even though its connection stays registered.
#[derive(Clone)]
pub struct SessionResolver {
    directory: TenantDirectory,
    registry: Arc<ConnectionRegistry>,
}

impl SessionResolver {
    pub fn new(directory: TenantDirectory, registry: Arc<ConnectionRegistry>) -> Self {
        Self { directory, registry }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub async fn resolve(&self, tenant: Option<&str>) -> Result<Session, SessionError> {
        let tenant = match tenant {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(SessionError::InvalidRequest("Missing tenant identifier".to_string())),
        };

        let meta = self.directory.get(tenant).await?.ok_or_else(|| {
            warn!("Session requested for unknown tenant '{}'", tenant);
            SessionError::TenantNotFound(tenant.to_string())
        })?;

        // Key the registry by the id the caller used, not the stored record
        let mut endpoint = Endpoint::from(&meta);
        endpoint.name = tenant.to_string();

        let connection = self.registry.get_or_connect(&endpoint).await?;
        debug!("Resolved session for tenant '{}'", tenant);

        Ok(Session { connection })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryConnector;
    use crate::cache::SerializerFormat;
    use crate::models::TenantMetaData;

    struct Fixture {
        connector: Arc<MemoryConnector>,
        directory: TenantDirectory,
        resolver: SessionResolver,
    }

    async fn fixture() -> Fixture {
        let connector = Arc::new(MemoryConnector::new());
        let endpoint = Endpoint::new("directory", "directory", 1408, SerializerFormat::Json);
        let directory = TenantDirectory::connect(connector.as_ref(), &endpoint, "tenants")
            .await
            .unwrap();
        let registry = Arc::new(ConnectionRegistry::new(connector.clone()));
        let resolver = SessionResolver::new(directory.clone(), registry);
        Fixture { connector, directory, resolver }
    }

    fn meta(tenant: &str, host: &str) -> TenantMetaData {
        TenantMetaData {
            tenant: tenant.into(),
            host_name: host.into(),
            port: 1408,
            serializer: "json".into(),
            tenant_type: "gold".into(),
        }
    }

    #[tokio::test]
    async fn blank_or_missing_tenant_is_invalid() {
        let f = fixture().await;
        for tenant in [None, Some(""), Some("   ")] {
            let err = f.resolver.resolve(tenant).await.err().unwrap();
            assert!(matches!(err, SessionError::InvalidRequest(_)), "{:?}", tenant);
        }
    }

    #[tokio::test]
    async fn tenant_id_is_looked_up_as_given() {
        let f = fixture().await;
        f.directory.put(&meta("acme", "h1")).await.unwrap();

        let err = f.resolver.resolve(Some(" acme ")).await.err().unwrap();
        assert!(matches!(err, SessionError::TenantNotFound(t) if t == " acme "));
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found() {
        let f = fixture().await;
        let err = f.resolver.resolve(Some("nobody")).await.err().unwrap();
        assert!(matches!(err, SessionError::TenantNotFound(t) if t == "nobody"));
        assert!(f.resolver.registry().is_empty().await);
    }

    #[tokio::test]
    async fn resolving_twice_reuses_the_connection() {
        let f = fixture().await;
        f.directory.put(&meta("acme", "h1")).await.unwrap();
        let before = f.connector.connect_count();

        let a = f.resolver.resolve(Some("acme")).await.unwrap();
        let b = f.resolver.resolve(Some("acme")).await.unwrap();

        assert!(Arc::ptr_eq(a.connection(), b.connection()));
        assert_eq!(f.connector.connect_count(), before + 1);
        assert_eq!(a.connection().endpoint().address(), "h1:1408");
    }

    #[tokio::test]
    async fn concurrent_resolves_share_one_connection() {
        let f = fixture().await;
        f.directory.put(&meta("acme", "h1")).await.unwrap();

        let (a, b) = tokio::join!(f.resolver.resolve(Some("acme")), f.resolver.resolve(Some("acme")));
        assert!(Arc::ptr_eq(a.unwrap().connection(), b.unwrap().connection()));
    }

    #[tokio::test]
    async fn deleted_tenant_stops_resolving() {
        let f = fixture().await;
        f.directory.put(&meta("acme", "h1")).await.unwrap();
        f.resolver.resolve(Some("acme")).await.unwrap();

        f.directory.remove("acme").await.unwrap();

        let err = f.resolver.resolve(Some("acme")).await.err().unwrap();
        assert!(matches!(err, SessionError::TenantNotFound(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_backend_error() {
        let f = fixture().await;
        f.directory.put(&meta("acme", "down")).await.unwrap();
        f.connector.refuse("down:1408").await;

        let err = f.resolver.resolve(Some("acme")).await.err().unwrap();
        assert!(matches!(err, SessionError::Backend(CacheError::ConnectionFailed { .. })));
    }

    #[tokio::test]
    async fn session_caches_live_on_the_tenant_backend() {
        let f = fixture().await;
        f.directory.put(&meta("a", "h1")).await.unwrap();
        f.directory.put(&meta("b", "h2")).await.unwrap();

        let a = f.resolver.resolve(Some("a")).await.unwrap();
        let b = f.resolver.resolve(Some("b")).await.unwrap();

        a.cache::<String>("users").put("k", &"from a".to_string()).await.unwrap();
        assert_eq!(b.cache::<String>("users").get("k").await.unwrap(), None);
    }
}
