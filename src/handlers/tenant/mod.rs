// handlers/tenant/mod.rs - Tenant directory handlers
//
// CRUD over tenant connection metadata. No tenant header is needed here;
// these routes manage the directory itself.

pub mod create; // POST /tenants
pub mod delete; // DELETE /tenants/:id
pub mod get;    // GET /tenants/:id
pub mod update; // PUT /tenants/:id

pub use create::tenant_create;
pub use delete::tenant_delete;
pub use get::tenant_get;
pub use update::tenant_update;

use crate::error::ApiError;

pub(crate) fn unknown_tenant(id: &str) -> ApiError {
    ApiError::not_found(format!("Unknown tenant {}", id))
}
