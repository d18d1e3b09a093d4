// handlers/user/update.rs - PUT /users/:id handler

use axum::{
    extract::{Path, State},
    Json,
};

use super::{unknown_user, users_for};
use crate::error::ApiResult;
use crate::middleware::{ApiJson, TenantHeader};
use crate::models::{User, UserPayload};
use crate::state::AppState;

/// Partial update: blank or missing fields keep their stored values
pub async fn user_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    tenant: TenantHeader,
    ApiJson(payload): ApiJson<UserPayload>,
) -> ApiResult<Json<User>> {
    let users = users_for(&state, &tenant).await?;
    let mut user = users.get(&id).await?.ok_or_else(|| unknown_user(&id))?;

    user.apply(payload);
    users.put(&id, &user).await?;

    Ok(Json(user))
}
