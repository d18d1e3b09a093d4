use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use super::{CacheError, Result};

/// Wire format used for values stored through a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializerFormat {
    #[default]
    Json,
    Yaml,
}

impl SerializerFormat {
    /// Resolves a serializer name from tenant metadata. Unknown names fall
    /// back to JSON so a tenant is never unreachable because of its format.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" | "" => SerializerFormat::Json,
            "yaml" | "yml" => SerializerFormat::Yaml,
            other => {
                tracing::warn!("Unknown serializer format '{}', falling back to json", other);
                SerializerFormat::Json
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SerializerFormat::Json => "json",
            SerializerFormat::Yaml => "yaml",
        }
    }

    pub fn encode<V: Serialize>(&self, value: &V) -> Result<Vec<u8>> {
        match self {
            SerializerFormat::Json => {
                serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
            }
            SerializerFormat::Yaml => serde_yaml::to_string(value)
                .map(String::into_bytes)
                .map_err(|e| CacheError::Serialization(e.to_string())),
        }
    }

    pub fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<V> {
        match self {
            SerializerFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
            }
            SerializerFormat::Yaml => {
                serde_yaml::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
            }
        }
    }
}

impl fmt::Display for SerializerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
