// handlers/tenant/get.rs - GET /tenants/:id handler

use axum::{
    extract::{Path, State},
    Json,
};

use super::unknown_tenant;
use crate::error::ApiResult;
use crate::models::TenantMetaData;
use crate::state::AppState;

pub async fn tenant_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<TenantMetaData>> {
    let meta = state.directory.get(&id).await?.ok_or_else(|| unknown_tenant(&id))?;
    Ok(Json(meta))
}
