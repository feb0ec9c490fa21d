//! User document schema
//!
//! Stores registered user credentials, keyed by email.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// Collection name for supplies (schemaless)
pub const SUPPLY_COLLECTION: &str = "supplies";

/// Collection name for donations (schemaless)
pub const DONATION_COLLECTION: &str = "donations";

/// User document stored in MongoDB
///
/// The `password` field holds the bcrypt hash, never the plaintext. The field
/// name is kept as `password` for compatibility with existing data.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Display name
    pub name: String,

    /// Email, the unique account key. Uniqueness is enforced by a pre-insert
    /// existence check in the register handler, not by a unique index, so a
    /// race between concurrent registrations can create duplicates.
    pub email: String,

    /// bcrypt password hash
    pub password: String,
}

impl UserDoc {
    /// Create a new user document
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            name,
            email,
            password: password_hash,
        }
    }
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // Non-unique index: speeds up the login lookup without changing the
        // documented duplicate-email behavior.
        vec![(
            doc! { "email": 1 },
            Some(IndexOptions::builder().name("email_index".to_string()).build()),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_without_id_when_unset() {
        let user = UserDoc::new(
            "A".to_string(),
            "a@x.com".to_string(),
            "$2b$10$hash".to_string(),
        );
        let doc = bson::to_document(&user).unwrap();

        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("email").unwrap(), "a@x.com");
        assert_eq!(doc.get_str("password").unwrap(), "$2b$10$hash");
    }

    #[test]
    fn email_index_is_not_unique() {
        let indices = UserDoc::into_indices();
        assert_eq!(indices.len(), 1);

        let (keys, opts) = &indices[0];
        assert_eq!(keys.get_i32("email").unwrap(), 1);
        assert!(opts.as_ref().unwrap().unique.is_none());
    }
}
