pub mod tenant_directory;

pub use tenant_directory::TenantDirectory;
