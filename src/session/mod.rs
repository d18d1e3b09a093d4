//! Tenant to connection routing.
//!
//! [`SessionResolver`] looks a tenant up in the directory and hands back a
//! [`Session`] over the tenant's connection, opening it through the
//! [`ConnectionRegistry`] the first time the tenant is seen.

pub mod registry;
pub mod resolver;

pub use registry::ConnectionRegistry;
pub use resolver::{Session, SessionError, SessionResolver};
