// handlers/tenant/delete.rs - DELETE /tenants/:id handler

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use super::unknown_tenant;
use crate::error::ApiResult;
use crate::models::TenantMetaData;
use crate::state::AppState;

/// Removes the tenant and returns the removed record. An established
/// connection for the tenant stays registered but is no longer reachable,
/// since every user request re-reads the directory first.
pub async fn tenant_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<TenantMetaData>> {
    let meta = state.directory.remove(&id).await?.ok_or_else(|| unknown_tenant(&id))?;
    info!("Removed tenant '{}'", id);
    Ok(Json(meta))
}
