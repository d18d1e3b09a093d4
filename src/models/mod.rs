pub mod tenant;
pub mod user;

pub use tenant::{TenantMetaData, TenantUpdate};
pub use user::{MissingField, User, UserPayload};

/// Keeps a value only when it carries non-whitespace text
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
