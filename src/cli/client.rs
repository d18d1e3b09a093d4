use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::middleware::TENANT_HEADER;

/// Thin JSON client for the REST API
pub struct ApiClient {
    base_url: url::Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(server: &str) -> anyhow::Result<Self> {
        let base_url = url::Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn url(&self, path: &str) -> anyhow::Result<url::Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid request path '{}'", path))
    }

    /// Sends a request and returns the status and JSON body (Null when empty).
    /// Non-success statuses are returned, not turned into errors.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        tenant: Option<&str>,
        body: Option<&Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut request = self.http.request(method, self.url(path)?);
        if let Some(tenant) = tenant {
            request = request.header(TENANT_HEADER, tenant);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.context("request failed")?;
        let status = response.status();
        let bytes = response.bytes().await.context("failed to read response")?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        Ok((status, value))
    }

    /// Like [`send`](Self::send) but fails on any non-success status,
    /// using the server's error message
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        tenant: Option<&str>,
        body: Option<&Value>,
    ) -> anyhow::Result<Value> {
        let (status, value) = self.send(method, path, tenant, body).await?;
        if status.is_success() {
            return Ok(value);
        }

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string());
        Err(anyhow!("{} ({})", message, status))
    }
}

/// Percent-encodes a single path segment
pub fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_onto_base() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        assert_eq!(client.url("/tenants/acme").unwrap().as_str(), "http://localhost:3000/tenants/acme");
    }

    #[test]
    fn rejects_bad_server_url() {
        assert!(ApiClient::new("not a url").is_err());
    }

    #[test]
    fn encodes_path_segments() {
        assert_eq!(segment("jane.doe"), "jane.doe");
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
    }
}
