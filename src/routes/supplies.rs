//! HTTP routes for the supplies collection
//!
//! Supplies are schemaless: request bodies are inserted verbatim and read
//! back as-is. Success responses use HTTP 201 across create, read, update,
//! and delete - a quirk of the original API surface that existing clients
//! depend on.

use bson::{doc, Document};
use futures_util::StreamExt;
use hyper::{Request, Response, StatusCode};
use mongodb::options::ReturnDocument;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::db::schemas::SUPPLY_COLLECTION;
use crate::routes::respond::{
    doc_to_json, json_response, parse_document_body, parse_object_id, BoxBody, Envelope,
};
use crate::server::AppState;
use crate::types::GatewayError;

/// Maximum number of documents returned by the preview listing
pub const PREVIEW_LIMIT: i64 = 6;

/// POST /api/v1/create-supply
pub async fn handle_create(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, GatewayError> {
    let body = parse_document_body(req).await?;

    let result = state
        .mongo
        .documents(SUPPLY_COLLECTION)
        .insert_one(body)
        .await
        .map_err(|e| GatewayError::Database(format!("Insert failed: {}", e)))?;

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope::ok("New Supply Added successfully!", insert_result_json(&result.inserted_id)),
    ))
}

/// GET /api/v1/supplies
pub async fn handle_list(state: Arc<AppState>) -> Result<Response<BoxBody>, GatewayError> {
    let cursor = state
        .mongo
        .documents(SUPPLY_COLLECTION)
        .find(doc! {})
        .await
        .map_err(|e| GatewayError::Database(format!("Find failed: {}", e)))?;

    let supplies = collect_documents(cursor).await;

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope::ok("Supplies are retrieved successfully!", Value::Array(supplies)),
    ))
}

/// GET /api/v1/filter-supplies
///
/// Preview listing, capped at [`PREVIEW_LIMIT`] documents.
pub async fn handle_preview(state: Arc<AppState>) -> Result<Response<BoxBody>, GatewayError> {
    let cursor = state
        .mongo
        .documents(SUPPLY_COLLECTION)
        .find(doc! {})
        .limit(PREVIEW_LIMIT)
        .await
        .map_err(|e| GatewayError::Database(format!("Find failed: {}", e)))?;

    let supplies = collect_documents(cursor).await;

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope::ok("Supplies are retrieved successfully!", Value::Array(supplies)),
    ))
}

/// GET /api/v1/supply/:id
///
/// `data` is the document, or null when no document matches.
pub async fn handle_get(
    id: &str,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, GatewayError> {
    let oid = parse_object_id(id)?;

    let found = state
        .mongo
        .documents(SUPPLY_COLLECTION)
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| GatewayError::Database(format!("Find failed: {}", e)))?;

    let data = found.map(|d| doc_to_json(&d)).unwrap_or(Value::Null);

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope::ok("Supplies is retrieved successfully!", data),
    ))
}

/// PUT /api/v1/supply/:id
///
/// Field-merge update: only the submitted fields are replaced, everything
/// else is left as stored. The response reflects the post-update document.
pub async fn handle_update(
    id: &str,
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, GatewayError> {
    let oid = parse_object_id(id)?;
    let body = parse_document_body(req).await?;

    let updated = state
        .mongo
        .documents(SUPPLY_COLLECTION)
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": body })
        .return_document(ReturnDocument::After)
        .await
        .map_err(|e| GatewayError::Database(format!("Update failed: {}", e)))?;

    let data = updated.map(|d| doc_to_json(&d)).unwrap_or(Value::Null);

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope::ok("Supplies is updated successfully!", data),
    ))
}

/// DELETE /api/v1/supply/:id
pub async fn handle_delete(
    id: &str,
    state: Arc<AppState>,
) -> Result<Response<BoxBody>, GatewayError> {
    let oid = parse_object_id(id)?;

    let result = state
        .mongo
        .documents(SUPPLY_COLLECTION)
        .delete_one(doc! { "_id": oid })
        .await
        .map_err(|e| GatewayError::Database(format!("Delete failed: {}", e)))?;

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope::ok(
            "Supplies is deleted successfully!",
            serde_json::json!({
                "acknowledged": true,
                "deletedCount": result.deleted_count,
            }),
        ),
    ))
}

/// Shape the driver's insert acknowledgment like the wire format clients
/// already parse: `{acknowledged, insertedId}`.
pub fn insert_result_json(inserted_id: &bson::Bson) -> Value {
    let id = match inserted_id {
        bson::Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.clone().into_relaxed_extjson(),
    };

    serde_json::json!({
        "acknowledged": true,
        "insertedId": id,
    })
}

/// Drain a cursor into response-ready JSON values, skipping documents that
/// fail to decode.
pub async fn collect_documents(cursor: mongodb::Cursor<Document>) -> Vec<Value> {
    cursor
        .filter_map(|item| async {
            match item {
                Ok(d) => Some(doc_to_json(&d)),
                Err(e) => {
                    error!("Error reading document: {}", e);
                    None
                }
            }
        })
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn preview_limit_is_six() {
        assert_eq!(PREVIEW_LIMIT, 6);
    }

    #[test]
    fn insert_result_flattens_object_id() {
        let oid = ObjectId::new();
        let json = insert_result_json(&bson::Bson::ObjectId(oid));

        assert_eq!(json["acknowledged"], true);
        assert_eq!(json["insertedId"], Value::String(oid.to_hex()));
    }
}
