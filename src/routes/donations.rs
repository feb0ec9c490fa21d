//! HTTP routes for the donations collection
//!
//! Donations are schemaless pass-through documents, queried by exact match
//! on their `email` field.

use bson::doc;
use hyper::{Request, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;

use crate::db::schemas::DONATION_COLLECTION;
use crate::routes::respond::{json_response, parse_document_body, BoxBody, Envelope};
use crate::routes::supplies::{collect_documents, insert_result_json};
use crate::server::AppState;
use crate::types::GatewayError;

/// POST /api/v1/add-donation
pub async fn handle_add(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, GatewayError> {
    let body = parse_document_body(req).await?;

    let result = state
        .mongo
        .documents(DONATION_COLLECTION)
        .insert_one(body)
        .await
        .map_err(|e| GatewayError::Database(format!("Insert failed: {}", e)))?;

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope::ok("Donation Added successfully!", insert_result_json(&result.inserted_id)),
    ))
}

/// GET /api/v1/donation/:email
///
/// Returns every donation whose `email` field equals the path value; an
/// empty array when there are none.
pub async fn handle_by_email(
    email: &str,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, GatewayError> {
    let cursor = state
        .mongo
        .documents(DONATION_COLLECTION)
        .find(doc! { "email": email })
        .await
        .map_err(|e| GatewayError::Database(format!("Find failed: {}", e)))?;

    let donations = collect_documents(cursor).await;

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope::ok("Donation is retrieved successfully!", Value::Array(donations)),
    ))
}
