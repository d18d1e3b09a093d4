// handlers/user/create.rs - POST /users handler

use axum::{extract::State, Json};
use tracing::info;

use super::users_for;
use crate::error::ApiResult;
use crate::middleware::{ApiJson, TenantHeader};
use crate::models::{User, UserPayload};
use crate::state::AppState;

/// Creates or replaces a user. The id is always `first.last` in lowercase;
/// an id in the body is ignored.
pub async fn user_create(
    State(state): State<AppState>,
    tenant: TenantHeader,
    ApiJson(payload): ApiJson<UserPayload>,
) -> ApiResult<Json<User>> {
    let users = users_for(&state, &tenant).await?;
    let user = User::from_payload(payload)?;

    users.put(&user.id, &user).await?;
    info!("Stored user '{}' for tenant '{}'", user.id, tenant.as_str());

    Ok(Json(user))
}
