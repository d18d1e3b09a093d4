use serde::{Deserialize, Serialize};

use super::non_blank;

/// A user stored in a tenant's `users` cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// Request body for creating or updating a user. Any `id` sent by the
/// caller is accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Why a payload could not become a new [`User`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

impl User {
    /// Derives the immutable user id: `first.last`, lowercased
    pub fn derive_id(first_name: &str, last_name: &str) -> String {
        format!("{}.{}", first_name, last_name).to_lowercase()
    }

    /// Builds a new user from a create payload
    pub fn from_payload(payload: UserPayload) -> Result<Self, MissingField> {
        let first_name = non_blank(payload.first_name).ok_or(MissingField("firstName"))?;
        let last_name = non_blank(payload.last_name).ok_or(MissingField("lastName"))?;

        Ok(Self {
            id: Self::derive_id(&first_name, &last_name),
            first_name,
            last_name,
            email: payload.email.unwrap_or_default(),
        })
    }

    /// Overwrites names and email where the payload has non-blank values.
    /// The id never changes.
    pub fn apply(&mut self, payload: UserPayload) -> bool {
        let mut changed = false;

        if let Some(first_name) = non_blank(payload.first_name) {
            self.first_name = first_name;
            changed = true;
        }
        if let Some(last_name) = non_blank(payload.last_name) {
            self.last_name = last_name;
            changed = true;
        }
        if let Some(email) = non_blank(payload.email) {
            self.email = email;
            changed = true;
        }

        changed
    }
}
