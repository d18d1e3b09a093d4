//! Runtime health: a started flag plus a set of registered checks.
//!
//! The service is UP only when the runtime has started and every check
//! reports started, ready, live and safe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::services::TenantDirectory;
use crate::session::ConnectionRegistry;

/// Flags reported by one health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckStatus {
    pub started: bool,
    pub ready: bool,
    pub live: bool,
    pub safe: bool,
}

impl CheckStatus {
    pub fn healthy() -> Self {
        Self { started: true, ready: true, live: true, safe: true }
    }

    pub fn all_pass(&self) -> bool {
        self.started && self.ready && self.live && self.safe
    }
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> CheckStatus;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

/// Aggregate flags, named the way monitoring dashboards expect them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthDetails {
    pub runtime: bool,
    pub started: bool,
    pub ready: bool,
    pub live: bool,
    pub safe: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub name: String,
    #[serde(flatten)]
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: Status,
    pub details: HealthDetails,
    pub checks: Vec<CheckReport>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn is_up(&self) -> bool {
        self.status == Status::Up
    }
}

/// Registered checks plus whether the runtime has finished starting
#[derive(Default)]
pub struct HealthRegistry {
    started: AtomicBool,
    checks: RwLock<Vec<Arc<dyn HealthCheck>>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_started(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    pub fn mark_stopped(&self) {
        self.started.store(false, Ordering::SeqCst);
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub async fn register(&self, check: Arc<dyn HealthCheck>) {
        self.checks.write().await.push(check);
    }

    /// Runs every check concurrently and folds the results
    pub async fn report(&self) -> HealthReport {
        let runtime = self.is_started();
        let checks = self.checks.read().await.clone();

        let checks: Vec<CheckReport> = if runtime {
            futures::future::join_all(checks.iter().map(|check| async move {
                CheckReport {
                    name: check.name().to_string(),
                    status: check.check().await,
                }
            }))
            .await
        } else {
            Vec::new()
        };

        let details = HealthDetails {
            runtime,
            started: runtime && checks.iter().all(|c| c.status.started),
            ready: runtime && checks.iter().all(|c| c.status.ready),
            live: runtime && checks.iter().all(|c| c.status.live),
            safe: runtime && checks.iter().all(|c| c.status.safe),
        };

        let up = details.started && details.ready && details.live && details.safe;

        HealthReport {
            status: if up { Status::Up } else { Status::Down },
            details,
            checks,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Pings the tenant directory connection
pub struct DirectoryCheck {
    directory: TenantDirectory,
}

impl DirectoryCheck {
    pub fn new(directory: TenantDirectory) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl HealthCheck for DirectoryCheck {
    fn name(&self) -> &str {
        "directory"
    }

    async fn check(&self) -> CheckStatus {
        let reachable = match self.directory.connection().ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Directory health check failed: {}", e);
                false
            }
        };

        CheckStatus {
            started: true,
            ready: reachable,
            live: reachable,
            safe: reachable,
        }
    }
}

/// Pings every established tenant connection
///
/// Ready while the registry can hand out connections; safe only when none
/// of the open tenant connections has gone bad.
pub struct TenantConnectionsCheck {
    registry: Arc<ConnectionRegistry>,
}

impl TenantConnectionsCheck {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl HealthCheck for TenantConnectionsCheck {
    fn name(&self) -> &str {
        "tenant-connections"
    }

    async fn check(&self) -> CheckStatus {
        let connections = self.registry.connections().await;
        let results = futures::future::join_all(connections.iter().map(|c| c.ping())).await;

        let mut failed = 0;
        for (connection, result) in connections.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!("Tenant connection {} failed health check: {}", connection.endpoint(), e);
                failed += 1;
            }
        }

        CheckStatus {
            started: true,
            ready: true,
            live: true,
            safe: failed == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::MemoryConnector;
    use crate::cache::{Endpoint, SerializerFormat};

    struct Fixed(CheckStatus);

    #[async_trait]
    impl HealthCheck for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn check(&self) -> CheckStatus {
            self.0
        }
    }

    #[tokio::test]
    async fn down_until_runtime_started() {
        let health = HealthRegistry::new();
        health.register(Arc::new(Fixed(CheckStatus::healthy()))).await;

        let report = health.report().await;
        assert_eq!(report.status, Status::Down);
        assert!(!report.details.runtime);
        assert!(!report.details.ready);

        health.mark_started();
        assert!(health.report().await.is_up());

        health.mark_stopped();
        assert!(!health.report().await.is_up());
    }

    #[tokio::test]
    async fn any_failing_flag_means_down() {
        let health = HealthRegistry::new();
        health.mark_started();
        health.register(Arc::new(Fixed(CheckStatus::healthy()))).await;
        health
            .register(Arc::new(Fixed(CheckStatus { safe: false, ..CheckStatus::healthy() })))
            .await;

        let report = health.report().await;
        assert_eq!(report.status, Status::Down);
        assert!(report.details.ready);
        assert!(!report.details.safe);
        assert_eq!(report.checks.len(), 2);
    }

    #[tokio::test]
    async fn report_serializes_detail_fields() {
        let health = HealthRegistry::new();
        let value = serde_json::to_value(health.report().await).unwrap();
        assert_eq!(value["status"], "DOWN");
        for field in ["Runtime", "Started", "Ready", "Live", "Safe"] {
            assert_eq!(value["details"][field], false, "{}", field);
        }
    }

    #[tokio::test]
    async fn directory_check_follows_connection() {
        let connector = MemoryConnector::new();
        let endpoint = Endpoint::new("directory", "localhost", 1408, SerializerFormat::Json);
        let directory = TenantDirectory::connect(&connector, &endpoint, "tenants").await.unwrap();
        let check = DirectoryCheck::new(directory.clone());

        assert!(check.check().await.all_pass());

        directory.connection().close().await;
        assert!(!check.check().await.ready);
    }

    #[tokio::test]
    async fn closed_tenant_connection_is_unsafe() {
        let connector = Arc::new(MemoryConnector::new());
        let registry = Arc::new(ConnectionRegistry::new(connector));
        let check = TenantConnectionsCheck::new(registry.clone());
        assert!(check.check().await.all_pass());

        let endpoint = Endpoint::new("acme", "h1", 1408, SerializerFormat::Json);
        let conn = registry.get_or_connect(&endpoint).await.unwrap();
        conn.close().await;

        assert!(!check.check().await.safe);
    }
}
