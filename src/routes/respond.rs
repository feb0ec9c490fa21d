//! Shared response and body helpers for route handlers
//!
//! Every API route answers with the same JSON envelope:
//! `{success, message, data?}`. Failures that the routes do not explicitly
//! handle are mapped to a status code in one place (`error_response`).

use bson::{oid::ObjectId, Bson, Document};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::GatewayError;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Maximum accepted request body size (matches the reference deployment's
/// JSON body limit of 100kb)
const MAX_BODY_BYTES: usize = 100 * 1024;

/// Uniform response envelope
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn ok(message: &str, data: Value) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn message_only(success: bool, message: &str) -> Self {
        Self {
            success,
            message: message.to_string(),
            data: None,
        }
    }
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

pub fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    Full::new(Bytes::new())
        .map_err(|never| match never {})
        .boxed()
}

/// Map an error onto a status code and envelope
///
/// Malformed input becomes 400; everything else (store failures, signing
/// failures) becomes a structured 500 instead of a hung request.
pub fn error_response(err: GatewayError) -> Response<BoxBody> {
    let status = match err {
        GatewayError::BadRequest(_) | GatewayError::Http(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    json_response(status, &Envelope::message_only(false, &err.to_string()))
}

/// Not-found response for unknown paths
pub fn not_found(path: &str) -> Response<BoxBody> {
    json_response(
        StatusCode::NOT_FOUND,
        &Envelope::message_only(false, &format!("Not Found: {}", path)),
    )
}

/// Method-not-allowed response for known paths
pub fn method_not_allowed() -> Response<BoxBody> {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &Envelope::message_only(false, "Method not allowed"),
    )
}

/// Read and deserialize a JSON request body into a typed value
pub async fn parse_json_body<T, B>(req: Request<B>) -> Result<T, GatewayError>
where
    T: for<'de> Deserialize<'de>,
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let bytes = collect_body(req).await?;
    serde_json::from_slice(&bytes).map_err(|e| GatewayError::Http(format!("Invalid JSON: {}", e)))
}

/// Read a JSON request body as a schemaless BSON document
///
/// The body passes through to the store unmodified and unvalidated; the only
/// requirement is that it is a JSON object.
pub async fn parse_document_body<B>(req: Request<B>) -> Result<Document, GatewayError>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let bytes = collect_body(req).await?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| GatewayError::Http(format!("Invalid JSON: {}", e)))?;

    match bson::to_bson(&value) {
        Ok(Bson::Document(doc)) => Ok(doc),
        Ok(_) => Err(GatewayError::Http("Request body must be a JSON object".into())),
        Err(e) => Err(GatewayError::Http(format!("Invalid document: {}", e))),
    }
}

async fn collect_body<B>(req: Request<B>) -> Result<Bytes, GatewayError>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let body = req
        .collect()
        .await
        .map_err(|e| GatewayError::Http(format!("Failed to read body: {}", e)))?;

    let bytes = body.to_bytes();
    if bytes.len() > MAX_BODY_BYTES {
        return Err(GatewayError::Http("Request body too large".into()));
    }

    Ok(bytes)
}

/// Parse a path segment as a MongoDB ObjectId
pub fn parse_object_id(id: &str) -> Result<ObjectId, GatewayError> {
    ObjectId::parse_str(id)
        .map_err(|_| GatewayError::BadRequest(format!("Invalid document id: {}", id)))
}

/// Convert a stored document to a JSON value for the response
///
/// ObjectIds are flattened to their hex form so clients see
/// `"_id": "65f1..."` rather than extended-JSON `{"$oid": ...}`.
pub fn doc_to_json(doc: &Document) -> Value {
    let mut map = serde_json::Map::with_capacity(doc.len());
    for (key, value) in doc {
        let json = match value {
            Bson::ObjectId(oid) => Value::String(oid.to_hex()),
            other => other.clone().into_relaxed_extjson(),
        };
        map.insert(key.clone(), json);
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn envelope_omits_missing_data() {
        let json = serde_json::to_value(Envelope::message_only(false, "User already exists")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "User already exists");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn envelope_includes_data() {
        let json =
            serde_json::to_value(Envelope::ok("ok", serde_json::json!({"a": 1}))).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["a"], 1);
    }

    #[test]
    fn object_id_rejects_garbage() {
        assert!(parse_object_id("not-an-id").is_err());
        assert!(parse_object_id("").is_err());
        // 24 hex chars is the valid form
        assert!(parse_object_id("65f1a2b3c4d5e6f7a8b9c0d1").is_ok());
    }

    #[test]
    fn doc_to_json_flattens_object_ids() {
        let oid = ObjectId::new();
        let document = doc! { "_id": oid, "item": "water", "quantity": 40 };

        let json = doc_to_json(&document);
        assert_eq!(json["_id"], Value::String(oid.to_hex()));
        assert_eq!(json["item"], "water");
        assert_eq!(json["quantity"], 40);
    }

    fn body_request(payload: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .body(Full::new(Bytes::from(payload.to_string())))
            .unwrap()
    }

    #[test]
    fn document_body_accepts_json_object() {
        let parsed = tokio_test::block_on(parse_document_body(body_request(
            r#"{"item": "water", "quantity": 40}"#,
        )))
        .unwrap();

        assert_eq!(parsed.get_str("item").unwrap(), "water");
        assert_eq!(parsed.get_i64("quantity").unwrap(), 40);
    }

    #[test]
    fn document_body_rejects_non_object() {
        let err = tokio_test::block_on(parse_document_body(body_request("[1, 2]"))).unwrap_err();
        assert!(matches!(err, GatewayError::Http(_)));
    }

    #[test]
    fn document_body_rejects_invalid_json() {
        let err =
            tokio_test::block_on(parse_document_body(body_request("{not json"))).unwrap_err();
        assert!(matches!(err, GatewayError::Http(_)));
    }

    #[test]
    fn oversized_body_is_rejected() {
        let payload = format!(r#"{{"blob": "{}"}}"#, "x".repeat(MAX_BODY_BYTES));
        let err = tokio_test::block_on(parse_document_body(body_request(&payload))).unwrap_err();
        assert!(matches!(err, GatewayError::Http(_)));
    }

    #[test]
    fn bad_request_maps_to_400() {
        let resp = error_response(GatewayError::BadRequest("bad id".into()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_error_maps_to_500() {
        let resp = error_response(GatewayError::Database("down".into()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
