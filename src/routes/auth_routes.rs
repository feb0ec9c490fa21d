//! HTTP routes for authentication
//!
//! - POST /api/v1/register - Create an account (bcrypt-hashed password)
//! - POST /api/v1/login    - Authenticate and get a JWT token
//!
//! Registration enforces email uniqueness with a find-then-insert sequence.
//! The two steps are not atomic: concurrent registrations for the same email
//! can both pass the check and both insert. This is documented behavior of
//! the surface, kept as-is.

use bson::doc;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password};
use crate::db::schemas::{UserDoc, USER_COLLECTION};
use crate::routes::respond::{json_response, parse_json_body, BoxBody, Envelope};
use crate::server::AppState;
use crate::types::GatewayError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

/// Login failures answer with a bare message, no success flag. Kept for
/// compatibility with existing clients.
#[derive(Debug, Serialize)]
pub struct LoginErrorResponse {
    pub message: String,
}

/// POST /api/v1/register
///
/// Flow:
/// 1. Check whether the email already exists
/// 2. Hash the password with bcrypt (cost 10)
/// 3. Insert the user
pub async fn handle_register(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, GatewayError> {
    let body: RegisterRequest = parse_json_body(req).await?;

    let collection = state.mongo.collection::<UserDoc>(USER_COLLECTION).await?;

    if collection
        .find_one(doc! { "email": &body.email })
        .await?
        .is_some()
    {
        warn!("Registration rejected - email already exists: {}", body.email);
        return Ok(json_response(
            StatusCode::BAD_REQUEST,
            &Envelope::message_only(false, "User already exists"),
        ));
    }

    let password_hash = hash_password(&body.password)?;

    collection
        .insert_one(UserDoc::new(body.name, body.email.clone(), password_hash))
        .await?;

    info!("Registered new user: {}", body.email);

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope::message_only(true, "User registered successfully"),
    ))
}

/// POST /api/v1/login
///
/// Flow:
/// 1. Look up the user by email
/// 2. Verify the password against the stored bcrypt hash
/// 3. Generate and return a JWT token
pub async fn handle_login(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, GatewayError> {
    let body: LoginRequest = parse_json_body(req).await?;

    let collection = state.mongo.collection::<UserDoc>(USER_COLLECTION).await?;

    let user = match collection.find_one(doc! { "email": &body.email }).await? {
        Some(u) => u,
        None => {
            warn!("Login failed - user not found: {}", body.email);
            // Same message for unknown email and bad password, to avoid
            // leaking which accounts exist.
            return Ok(json_response(
                StatusCode::UNAUTHORIZED,
                &LoginErrorResponse {
                    message: "Invalid email or password".into(),
                },
            ));
        }
    };

    if !verify_password(&body.password, &user.password)? {
        warn!("Login failed - invalid password: {}", body.email);
        return Ok(json_response(
            StatusCode::UNAUTHORIZED,
            &LoginErrorResponse {
                message: "Invalid email or password".into(),
            },
        ));
    }

    let token = state.tokens.generate_token(&user.email)?;

    info!("Login successful: {}", body.email);

    Ok(json_response(
        StatusCode::OK,
        &LoginResponse {
            success: true,
            message: "Login successful".into(),
            token,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_never_contains_password() {
        let json = serde_json::to_value(LoginResponse {
            success: true,
            message: "Login successful".into(),
            token: "abc".into(),
        })
        .unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["token"], "abc");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn login_error_is_bare_message() {
        let json = serde_json::to_value(LoginErrorResponse {
            message: "Invalid email or password".into(),
        })
        .unwrap();

        assert_eq!(json["message"], "Invalid email or password");
        assert!(json.get("success").is_none());
    }
}
