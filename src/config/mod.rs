use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::cache::{Endpoint, SerializerFormat};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub directory: DirectoryConfig,
    pub tenants: TenantConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Which cache client to use for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    Memory,
    Redis,
}

impl Backend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Some(Backend::Memory),
            "redis" => Some(Backend::Redis),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where tenant metadata lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub backend: Backend,
    pub host: String,
    pub port: u16,
    pub serializer: String,
    pub cache_name: String,
}

/// How per-tenant connections are opened
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub backend: Backend,
    pub connect_timeout_secs: u64,
    pub users_cache: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl DirectoryConfig {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(
            "directory",
            self.host.clone(),
            self.port,
            SerializerFormat::from_name(&self.serializer),
        )
    }
}

impl TenantConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides(|key| env::var(key).ok())
    }

    fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = var("TCACHE_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = var("TCACHE_API_PORT")
            .or_else(|| var("PORT"))
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }

        // Directory overrides
        if let Some(v) = var("DIRECTORY_BACKEND") {
            self.directory.backend = Backend::parse(&v).unwrap_or(self.directory.backend);
        }
        if let Some(v) = var("DIRECTORY_HOST") {
            self.directory.host = v;
        }
        if let Some(v) = var("DIRECTORY_PORT") {
            self.directory.port = v.parse().unwrap_or(self.directory.port);
        }
        if let Some(v) = var("DIRECTORY_SERIALIZER") {
            self.directory.serializer = v;
        }
        if let Some(v) = var("DIRECTORY_CACHE") {
            self.directory.cache_name = v;
        }

        // Tenant connection overrides
        if let Some(v) = var("TENANT_BACKEND") {
            self.tenants.backend = Backend::parse(&v).unwrap_or(self.tenants.backend);
        }
        if let Some(v) = var("TENANT_CONNECT_TIMEOUT_SECS") {
            self.tenants.connect_timeout_secs = v.parse().unwrap_or(self.tenants.connect_timeout_secs);
        }
        if let Some(v) = var("TENANT_USERS_CACHE") {
            self.tenants.users_cache = v;
        }

        // API overrides
        if let Some(v) = var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Some(v) = var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Some(v) = var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            directory: DirectoryConfig {
                backend: Backend::Memory,
                host: "localhost".to_string(),
                port: 6379,
                serializer: "json".to_string(),
                cache_name: "tenants".to_string(),
            },
            tenants: TenantConfig {
                backend: Backend::Memory,
                connect_timeout_secs: 30,
                users_cache: "users".to_string(),
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            directory: DirectoryConfig {
                backend: Backend::Redis,
                host: "localhost".to_string(),
                port: 6379,
                serializer: "json".to_string(),
                cache_name: "tenants".to_string(),
            },
            tenants: TenantConfig {
                backend: Backend::Redis,
                connect_timeout_secs: 10,
                users_cache: "users".to_string(),
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            directory: DirectoryConfig {
                backend: Backend::Redis,
                host: "localhost".to_string(),
                port: 6379,
                serializer: "json".to_string(),
                cache_name: "tenants".to_string(),
            },
            tenants: TenantConfig {
                backend: Backend::Redis,
                connect_timeout_secs: 5,
                users_cache: "users".to_string(),
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global read-only config, initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
