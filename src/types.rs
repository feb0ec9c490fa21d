//! Error types for relief-gateway

use thiserror::Error;

/// Top-level error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration problem detected at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// MongoDB driver or query failure
    #[error("Database error: {0}")]
    Database(String),

    /// Password hashing or token signing failure
    #[error("Auth error: {0}")]
    Auth(String),

    /// Malformed request (bad JSON body, bad identifier)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP transport failure (body read, etc.)
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
