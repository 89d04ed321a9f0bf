//! User model and its public view.

use asti_core::{DocumentId, Email, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Document;

/// A stored user record.
///
/// The `verified` field is always true: there is no verification flow, the
/// field exists for wire compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub verified: bool,
    pub created_at: String,
}

impl User {
    /// Decode a user from its stored document.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the document is not a valid user record.
    pub fn from_document(doc: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(doc))
    }

    /// The view of this user that is safe to return to clients.
    #[must_use]
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            gender: self.gender.clone(),
            role: self.role,
            verified: self.verified,
        }
    }
}

/// The user view returned to clients. Never contains the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: DocumentId,
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub role: Role,
    pub verified: bool,
}
