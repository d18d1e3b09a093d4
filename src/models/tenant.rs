use serde::{Deserialize, Serialize};

use super::non_blank;

/// Connection metadata for one tenant, stored in the tenant directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantMetaData {
    pub tenant: String,
    pub host_name: String,
    pub port: u16,
    pub serializer: String,
    #[serde(rename = "type")]
    pub tenant_type: String,
}

/// Partial update body for PUT /tenants/:id
///
/// Only `type` and `port` can change. A blank type, or a port that is
/// absent, zero, negative or out of range, leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantUpdate {
    #[serde(rename = "type", default)]
    pub tenant_type: Option<String>,
    #[serde(default)]
    pub port: Option<i64>,
}

impl TenantMetaData {
    /// Merges `update` into this record, returning true if anything changed
    pub fn apply(&mut self, update: TenantUpdate) -> bool {
        let mut changed = false;

        if let Some(tenant_type) = non_blank(update.tenant_type) {
            self.tenant_type = tenant_type;
            changed = true;
        }

        if let Some(port) = update.port.filter(|p| *p > 0).and_then(|p| u16::try_from(p).ok()) {
            self.port = port;
            changed = true;
        }

        changed
    }
}
