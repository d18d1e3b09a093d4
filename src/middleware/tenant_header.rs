use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Name of the request header holding the tenant identifier
pub const TENANT_HEADER: &str = "tenant";

/// Required `tenant` header. Extracted from the request head, so a missing or
/// blank tenant is rejected before any body is read. The value is kept as sent.
#[derive(Debug, Clone)]
pub struct TenantHeader(pub String);

impl TenantHeader {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantHeader
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = match parts.headers.get(TENANT_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|_| ApiError::bad_request("Tenant header must be valid text"))?,
            None => "",
        };

        if value.trim().is_empty() {
            return Err(ApiError::bad_request("Missing tenant identifier"));
        }

        Ok(TenantHeader(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request, StatusCode};

    async fn extract(request: Request<()>) -> Result<TenantHeader, ApiError> {
        let (mut parts, _) = request.into_parts();
        TenantHeader::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_header_value() {
        let request = Request::builder().header("tenant", "acme").body(()).unwrap();
        assert_eq!(extract(request).await.unwrap().as_str(), "acme");
    }

    #[tokio::test]
    async fn keeps_surrounding_whitespace() {
        let request = Request::builder().header("tenant", " acme ").body(()).unwrap();
        assert_eq!(extract(request).await.unwrap().as_str(), " acme ");
    }

    #[tokio::test]
    async fn missing_header_is_bad_request() {
        let request = Request::builder().body(()).unwrap();
        let err = extract(request).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Missing tenant identifier");
    }

    #[tokio::test]
    async fn blank_header_is_bad_request() {
        let request = Request::builder().header("tenant", "   ").body(()).unwrap();
        let err = extract(request).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_text_header_is_bad_request() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .headers_mut()
            .insert("tenant", HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap());
        let err = extract(request).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
