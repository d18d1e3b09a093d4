// handlers/tenant/create.rs - POST /tenants handler

use axum::{extract::State, Json};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::middleware::ApiJson;
use crate::models::TenantMetaData;
use crate::state::AppState;

/// Stores the tenant under its own `tenant` field, replacing any existing entry
pub async fn tenant_create(
    State(state): State<AppState>,
    ApiJson(meta): ApiJson<TenantMetaData>,
) -> ApiResult<Json<TenantMetaData>> {
    if meta.tenant.trim().is_empty() {
        return Err(ApiError::bad_request("Missing tenant identifier"));
    }

    state.directory.put(&meta).await?;
    info!("Registered tenant '{}' at {}:{}", meta.tenant, meta.host_name, meta.port);

    Ok(Json(meta))
}
