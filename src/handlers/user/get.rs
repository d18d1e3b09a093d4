// handlers/user/get.rs - GET /users/:id handler

use axum::{
    extract::{Path, State},
    Json,
};

use super::{unknown_user, users_for};
use crate::error::ApiResult;
use crate::middleware::TenantHeader;
use crate::models::User;
use crate::state::AppState;

pub async fn user_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    tenant: TenantHeader,
) -> ApiResult<Json<User>> {
    let users = users_for(&state, &tenant).await?;
    let user = users.get(&id).await?.ok_or_else(|| unknown_user(&id))?;
    Ok(Json(user))
}
