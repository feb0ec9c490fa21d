//! Health and status endpoints
//!
//! - GET /          - Legacy status payload served at the root (no API prefix)
//! - GET /health    - Liveness probe with MongoDB connectivity
//! - GET /version   - Build info for deployment verification

use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::respond::{json_response, BoxBody};
use crate::server::AppState;

/// Root status payload
#[derive(Serialize)]
pub struct ServerStatus {
    pub message: &'static str,
    pub timestamp: String,
}

/// GET /
///
/// Static status with the current timestamp. Never fails.
pub fn server_status() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &ServerStatus {
            message: "Server is running smoothly",
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
    )
}

/// Liveness probe response
#[derive(Serialize)]
pub struct HealthResponse {
    /// True whenever the service is running
    pub healthy: bool,
    /// Service version
    pub version: &'static str,
    /// MongoDB connectivity
    pub mongo: MongoHealth,
    /// Current timestamp
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct MongoHealth {
    /// Whether the database answered a ping just now
    pub connected: bool,
    /// Database name in use
    pub database: String,
}

/// GET /health, /healthz
///
/// Always returns 200 while the process is up; the body carries the live
/// MongoDB status for monitoring.
pub async fn health_check(state: Arc<AppState>) -> Response<BoxBody> {
    let connected = state.mongo.ping().await.is_ok();

    json_response(
        StatusCode::OK,
        &HealthResponse {
            healthy: true,
            version: env!("CARGO_PKG_VERSION"),
            mongo: MongoHealth {
                connected,
                database: state.mongo.db_name().to_string(),
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
    )
}

/// Version information for deployment verification
#[derive(Serialize)]
pub struct VersionResponse {
    /// Cargo package version
    pub version: &'static str,
    /// Git commit hash (short)
    pub commit: &'static str,
    /// Git commit hash (full)
    pub commit_full: &'static str,
    /// Build timestamp
    pub build_time: &'static str,
    /// Service name
    pub service: &'static str,
}

/// GET /version
pub fn version_info() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
            commit_full: option_env!("GIT_COMMIT_FULL").unwrap_or("unknown"),
            build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
            service: "relief-gateway",
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_status_payload_shape() {
        let status = ServerStatus {
            message: "Server is running smoothly",
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["message"], "Server is running smoothly");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn server_status_is_200() {
        assert_eq!(server_status().status(), StatusCode::OK);
    }
}
