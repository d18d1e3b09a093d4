pub mod api_json;
pub mod tenant_header;

pub use api_json::ApiJson;
pub use tenant_header::{TenantHeader, TENANT_HEADER};
