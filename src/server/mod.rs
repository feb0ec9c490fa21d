//! HTTP server for relief-gateway

pub mod http;

pub use http::{run, AppState};
