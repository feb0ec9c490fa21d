//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one spawned task per connection. Routing is a
//! single match on (method, path); handlers return `Result` and any error
//! they do not turn into an explicit response is mapped to a status code at
//! this boundary.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::auth::TokenIssuer;
use crate::config::Args;
use crate::db::MongoClient;
use crate::routes;
use crate::routes::respond::BoxBody;
use crate::types::GatewayError;

/// Shared application state
///
/// Constructed once at startup and injected into every handler. Holds only
/// configuration, the shared MongoDB handle, and the token issuer; the
/// service keeps no other state between requests.
pub struct AppState {
    pub args: Args,
    pub mongo: MongoClient,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(args: Args, mongo: MongoClient) -> Self {
        let tokens = TokenIssuer::new(args.jwt_secret(), args.jwt_expiry_seconds);
        Self {
            args,
            mongo,
            tokens,
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), GatewayError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("relief-gateway listening on {}", state.args.listen);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    // CORS preflight for any path
    if method == Method::OPTIONS {
        return Ok(routes::cors_preflight());
    }

    let response = match (method, path.as_str()) {
        // Root status payload (no API prefix)
        (Method::GET, "/") => routes::server_status(),

        // Liveness probe and build info
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state)).await
        }
        (Method::GET, "/version") => routes::version_info(),

        // Auth
        (Method::POST, "/api/v1/register") => {
            unwrap_result(routes::handle_register(req, state).await)
        }
        (Method::POST, "/api/v1/login") => unwrap_result(routes::handle_login(req, state).await),

        // Supplies
        (Method::POST, "/api/v1/create-supply") => {
            unwrap_result(routes::handle_create_supply(req, state).await)
        }
        (Method::GET, "/api/v1/supplies") => unwrap_result(routes::handle_list_supplies(state).await),
        (Method::GET, "/api/v1/filter-supplies") => {
            unwrap_result(routes::handle_preview_supplies(state).await)
        }
        (Method::GET, p) if p.starts_with("/api/v1/supply/") => {
            let id = decode_path_param(p.strip_prefix("/api/v1/supply/").unwrap_or(""));
            unwrap_result(routes::handle_get_supply(&id, state).await)
        }
        (Method::PUT, p) if p.starts_with("/api/v1/supply/") => {
            let id = decode_path_param(p.strip_prefix("/api/v1/supply/").unwrap_or(""));
            unwrap_result(routes::handle_update_supply(&id, req, state).await)
        }
        (Method::DELETE, p) if p.starts_with("/api/v1/supply/") => {
            let id = decode_path_param(p.strip_prefix("/api/v1/supply/").unwrap_or(""));
            unwrap_result(routes::handle_delete_supply(&id, state).await)
        }

        // Donations
        (Method::POST, "/api/v1/add-donation") => {
            unwrap_result(routes::handle_add_donation(req, state).await)
        }
        (Method::GET, p) if p.starts_with("/api/v1/donation/") => {
            let email = decode_path_param(p.strip_prefix("/api/v1/donation/").unwrap_or(""));
            unwrap_result(routes::handle_donations_by_email(&email, state).await)
        }

        // Known paths with the wrong method
        (_, p) if is_known_api_path(p) => routes::method_not_allowed(),

        // Not found
        _ => routes::not_found(&path),
    };

    Ok(response)
}

/// Percent-decode a path parameter
///
/// Clients send emails (and occasionally ids) percent-encoded, e.g.
/// `/api/v1/donation/a%40x.com`. The store holds the decoded form, so the
/// segment is decoded before querying. Segments that do not decode to valid
/// UTF-8 are passed through unchanged.
fn decode_path_param(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Whether a path belongs to the API surface (used to answer 405 instead of
/// 404 when only the method is wrong)
fn is_known_api_path(path: &str) -> bool {
    matches!(
        path,
        "/api/v1/register"
            | "/api/v1/login"
            | "/api/v1/create-supply"
            | "/api/v1/supplies"
            | "/api/v1/filter-supplies"
            | "/api/v1/add-donation"
    ) || path.starts_with("/api/v1/supply/")
        || path.starts_with("/api/v1/donation/")
}

/// Map handler errors to a structured status-code response
fn unwrap_result(result: Result<Response<BoxBody>, GatewayError>) -> Response<BoxBody> {
    result.unwrap_or_else(routes::error_response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_encoded_email_segment() {
        assert_eq!(decode_path_param("a%40x.com"), "a@x.com");
        assert_eq!(decode_path_param("user%2Btag%40x.com"), "user+tag@x.com");
    }

    #[test]
    fn plain_segments_pass_through() {
        assert_eq!(decode_path_param("a@x.com"), "a@x.com");
        assert_eq!(decode_path_param("65f1a2b3c4d5e6f7a8b9c0d1"), "65f1a2b3c4d5e6f7a8b9c0d1");
    }

    #[test]
    fn wrong_method_on_parameterized_paths_is_known() {
        // PATCH on these answers 405, not 404
        assert!(is_known_api_path("/api/v1/supply/65f1a2b3c4d5e6f7a8b9c0d1"));
        assert!(is_known_api_path("/api/v1/donation/a@x.com"));
        assert!(is_known_api_path("/api/v1/register"));
    }

    #[test]
    fn unknown_paths_are_not_known() {
        assert!(!is_known_api_path("/api/v1/unknown"));
        assert!(!is_known_api_path("/api/v2/supplies"));
        assert!(!is_known_api_path("/"));
    }
}
