// handlers/user/delete.rs - DELETE /users/:id handler

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use super::{unknown_user, users_for};
use crate::error::ApiResult;
use crate::middleware::TenantHeader;
use crate::state::AppState;

pub async fn user_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    tenant: TenantHeader,
) -> ApiResult<StatusCode> {
    let users = users_for(&state, &tenant).await?;
    users.remove(&id).await?.ok_or_else(|| unknown_user(&id))?;
    Ok(StatusCode::NO_CONTENT)
}
