// handlers/tenant/update.rs - PUT /tenants/:id handler

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use super::unknown_tenant;
use crate::error::ApiResult;
use crate::middleware::ApiJson;
use crate::models::{TenantMetaData, TenantUpdate};
use crate::state::AppState;

/// Partial update: only a non-blank `type` and a positive `port` are applied
pub async fn tenant_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<TenantUpdate>,
) -> ApiResult<Json<TenantMetaData>> {
    let mut meta = state.directory.get(&id).await?.ok_or_else(|| unknown_tenant(&id))?;

    if !meta.apply(update) {
        debug!("Update for tenant '{}' changed nothing", id);
    }

    state.directory.put(&meta).await?;
    Ok(Json(meta))
}
