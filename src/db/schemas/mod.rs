//! Database schemas for relief-gateway
//!
//! Only the credential store has a fixed shape. Supplies and donations are
//! schemaless `bson::Document` collections accessed through
//! `MongoClient::documents`.

mod user;

pub use user::{UserDoc, DONATION_COLLECTION, SUPPLY_COLLECTION, USER_COLLECTION};
