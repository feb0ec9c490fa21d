//! MongoDB access for relief-gateway

pub mod mongo;
pub mod schemas;

pub use mongo::{MongoClient, MongoCollection};
