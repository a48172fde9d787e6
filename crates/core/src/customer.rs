use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::Entity;
use crate::id::CustomerId;

/// A stored customer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub status: String,
}

impl Customer {
    pub fn from_draft(id: CustomerId, draft: CustomerDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            status: draft.status,
        }
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

/// Client-writable customer fields.
///
/// Missing or `null` fields become empty strings; any `id` in the payload is
/// ignored because ids are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
}

impl CustomerDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            status: status.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
