// handlers/user/mod.rs - Tenant-scoped user handlers
//
// Every route needs the `tenant` header. The tenant is resolved to its own
// backend connection and the request runs against that connection's users
// cache.

pub mod create; // POST /users
pub mod delete; // DELETE /users/:id
pub mod get;    // GET /users/:id
pub mod update; // PUT /users/:id

pub use create::user_create;
pub use delete::user_delete;
pub use get::user_get;
pub use update::user_update;

use crate::cache::TypedCache;
use crate::error::{ApiError, ApiResult};
use crate::middleware::TenantHeader;
use crate::models::User;
use crate::state::AppState;

/// Resolves the tenant header to that tenant's users cache
pub(crate) async fn users_for(state: &AppState, tenant: &TenantHeader) -> ApiResult<TypedCache<User>> {
    let session = state.resolver.resolve(Some(tenant.as_str())).await?;
    Ok(session.cache(state.users_cache()))
}

pub(crate) fn unknown_user(id: &str) -> ApiError {
    ApiError::not_found(format!("Unknown user {}", id))
}
