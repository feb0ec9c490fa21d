//! relief-gateway - HTTP API for the relief supplies and donations platform
//!
//! A thin gateway: every route maps one-to-one onto a single MongoDB
//! operation and answers with a fixed `{success, message, data?}` envelope.
//!
//! ## Surface
//!
//! - **Auth**: registration and login against the `users` collection,
//!   bcrypt-hashed passwords, JWT session tokens
//! - **Supplies**: schemaless CRUD on the `supplies` collection
//! - **Donations**: schemaless inserts and per-email queries on the
//!   `donations` collection
//! - **Health**: root status payload, liveness probe, and build info

pub mod auth;
pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{GatewayError, Result};
