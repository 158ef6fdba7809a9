//
//  wsapi-client
//  api/mapper.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Response Mapper
//!
//! Decodes WSAPI response bodies into [`WsapiObject`] values.
//!
//! WSAPI wraps every response in an envelope. Queries come back as
//!
//! ```json
//! {"QueryResult": {"TotalResultCount": 2, "Errors": [], "Results": [{"_type": "User", ...}]}}
//! ```
//!
//! while single-object reads use the type tag itself as the only key:
//!
//! ```json
//! {"User": {"_refObjectName": "Antti Pitkanen", ...}}
//! ```
//!
//! Failed operations use `{"OperationResult": {"Errors": [...]}}`.
//!
//! Envelope errors are looked up in `QueryResult` first, then in
//! `OperationResult`. A document with neither key reports an empty error
//! list, so a malformed envelope surfaces as `Errors: []` rather than a
//! decode failure.

use serde_json::{Map, Value};

use super::common::{ApiError, RawResponse, Result};
use crate::models::{resolve, WsapiObject};

/// Maps a single-object response.
///
/// The body must decode to a JSON object with exactly one top-level key and
/// no envelope errors. The key is used as the type tag. Write responses
/// (`{"OperationResult": {"Object": {...}}}`) map to the embedded object,
/// resolved by its `_type`; without an `Object` they map like any other
/// single-key document.
///
/// # Errors
///
/// Returns an [`ErrorKind::ApiError`](super::common::ErrorKind::ApiError) when
/// the body is not JSON, when the envelope carries errors, or when the
/// document does not have exactly one top-level key.
///
/// # Example
///
/// ```rust
/// use wsapi_client::api::common::RawResponse;
/// use wsapi_client::api::mapper::map_single;
/// use wsapi_client::models::WsapiEntity;
///
/// let body = r#"{"User": {"_refObjectName": "antti", "FirstName": "Antti", "LastName": "Pitkanen",
///                "EmailAddress": "apitkanen@rallydev.com"}}"#;
/// let user = map_single(&RawResponse::new(200, "https://example.com", body)).unwrap();
///
/// assert_eq!(user.name().as_deref(), Some("Antti Pitkanen"));
/// assert_eq!(user.as_user().and_then(|u| u.email()), Some("apitkanen@rallydev.com"));
/// ```
pub fn map_single(response: &RawResponse) -> Result<WsapiObject> {
    let json = decode(response)?;
    let errors = extract_errors(&json);

    if errors.is_empty() {
        if let Some(document) = json.as_object().filter(|document| document.len() == 1) {
            if let Some((tag, Value::Object(raw))) = document.iter().next() {
                if tag == "OperationResult" {
                    if let Some(Value::Object(object)) = raw.get("Object") {
                        let tag = object.get("_type").and_then(Value::as_str);
                        return Ok(resolve(tag, object.clone()));
                    }
                }
                return Ok(resolve(Some(tag.as_str()), raw.clone()));
            }
        }
    }

    Err(ApiError::envelope(errors, response))
}

/// Maps a query response into its results, in server order.
///
/// Each element of `QueryResult.Results` is resolved by its own `_type`, so a
/// single page may mix models.
///
/// # Errors
///
/// Returns an [`ErrorKind::ApiError`](super::common::ErrorKind::ApiError) when
/// the body is not JSON, when there is no `QueryResult` envelope, or when the
/// envelope carries errors.
pub fn map_many(response: &RawResponse) -> Result<Vec<WsapiObject>> {
    let json = decode(response)?;
    let errors = extract_errors(&json);

    let query_result = match json.get("QueryResult") {
        Some(query_result) if errors.is_empty() => query_result,
        _ => return Err(ApiError::envelope(errors, response)),
    };

    let results = match query_result.get("Results") {
        Some(Value::Array(results)) => results.as_slice(),
        None | Some(Value::Null) => &[],
        Some(_) => {
            return Err(ApiError::api_error(
                "QueryResult.Results is not a list",
                Some(response.clone()),
            ))
        }
    };

    results
        .iter()
        .map(|result| match result {
            Value::Object(raw) => {
                let tag = raw.get("_type").and_then(Value::as_str);
                Ok(resolve(tag, raw.clone()))
            }
            other => Err(ApiError::api_error(
                format!("Unexpected query result entry: {}", other),
                Some(response.clone()),
            )),
        })
        .collect()
}

/// Reads `QueryResult.TotalResultCount` from a query response.
pub fn total_result_count(response: &RawResponse) -> Result<u64> {
    let json = decode(response)?;

    json.get("QueryResult")
        .and_then(|result| result.get("TotalResultCount"))
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            ApiError::api_error(
                "Missing QueryResult.TotalResultCount",
                Some(response.clone()),
            )
        })
}

/// Collects the envelope errors of a decoded document.
pub fn extract_errors(json: &Value) -> Vec<String> {
    let envelope = json
        .get("QueryResult")
        .or_else(|| json.get("OperationResult"));

    match envelope.and_then(|envelope| envelope.get("Errors")) {
        Some(Value::Array(errors)) => errors
            .iter()
            .map(|error| match error {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn decode(response: &RawResponse) -> Result<Value> {
    serde_json::from_str(&response.body).map_err(|_| {
        ApiError::api_error(
            format!("Invalid JSON response from WSAPI: {}", response.body),
            Some(response.clone()),
        )
    })
}

/// Wraps partial-update fields in the envelope WSAPI expects for writes,
/// e.g. `{"defect": {"Owner": "/user/1"}}`.
pub fn update_envelope(resource_type: &str, fields: Map<String, Value>) -> Value {
    let mut envelope = Map::new();
    envelope.insert(resource_type.to_string(), Value::Object(fields));
    Value::Object(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ErrorKind;
    use crate::models::WsapiEntity;
    use serde_json::json;

    fn response(body: &str) -> RawResponse {
        RawResponse::new(200, "https://example.com/v3.0/User", body)
    }

    #[test]
    fn test_map_single_user() {
        let body = include_str!("../../tests/fixtures/user.json");
        let user = map_single(&response(body)).unwrap();
        assert_eq!(user.type_tag(), "User");
        assert_eq!(user.name().as_deref(), Some("Antti Pitkanen"));
        assert_eq!(
            user.as_user().and_then(|u| u.email()),
            Some("apitkanen@rallydev.com")
        );
    }

    #[test]
    fn test_map_single_unknown_tag_is_generic() {
        let object = map_single(&response(r#"{"Defect": {"_refObjectName": "Broken"}}"#)).unwrap();
        assert_eq!(object.type_tag(), "Object");
        assert_eq!(object.name().as_deref(), Some("Broken"));
    }

    #[test]
    fn test_map_single_rejects_multiple_keys() {
        let err = map_single(&response(r#"{"User": {}, "Project": {}}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert!(err.errors().is_empty());
        assert_eq!(err.message(), "Errors: []");
    }

    #[test]
    fn test_map_single_rejects_empty_document() {
        let err = map_single(&response("{}")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiError);
    }

    #[test]
    fn test_map_single_unwraps_write_result() {
        let body = include_str!("../../tests/fixtures/defect.json");
        let defect = map_single(&response(body)).unwrap();
        assert_eq!(defect.type_tag(), "Object");
        assert_eq!(defect.name().as_deref(), Some("Login button does nothing"));
    }

    #[test]
    fn test_map_single_operation_result_without_object() {
        let body = r#"{"OperationResult": {"Errors": [], "Warnings": []}}"#;
        let object = map_single(&response(body)).unwrap();
        assert_eq!(object.type_tag(), "Object");
        assert!(object.raw().contains_key("Warnings"));
    }

    #[test]
    fn test_map_single_reports_operation_errors() {
        let body = r#"{"OperationResult": {"Errors": ["Not authorized to perform action"]}}"#;
        let err = map_single(&response(body)).unwrap_err();
        assert_eq!(err.errors(), ["Not authorized to perform action".to_string()]);
    }

    #[test]
    fn test_invalid_json_includes_body() {
        let err = map_single(&response("{invalid_json: ")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert!(err.message().contains("{invalid_json: "));

        let err = map_many(&response("<html>")).unwrap_err();
        assert!(err.message().contains("<html>"));
    }

    #[test]
    fn test_map_many_keeps_order_with_mixed_types() {
        let body = json!({
            "QueryResult": {
                "TotalResultCount": 3,
                "Errors": [],
                "Results": [
                    {"_type": "Project", "_refObjectName": "first"},
                    {"_type": "User", "FirstName": "Second", "LastName": "User"},
                    {"_type": "Defect", "_refObjectName": "third"}
                ]
            }
        })
        .to_string();
        let objects = map_many(&response(&body)).unwrap();
        let tags: Vec<_> = objects.iter().map(WsapiObject::type_tag).collect();
        assert_eq!(tags, ["Project", "User", "Object"]);
        assert_eq!(objects[1].name().as_deref(), Some("Second User"));
        assert_eq!(objects[2].name().as_deref(), Some("third"));
    }

    #[test]
    fn test_map_many_reports_query_errors() {
        let body = include_str!("../../tests/fixtures/query_error.json");
        let err = map_many(&response(body)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert!(!err.errors().is_empty());
    }

    #[test]
    fn test_map_many_requires_query_result() {
        let err = map_many(&response(r#"{"User": {}}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert!(err.errors().is_empty());
    }

    #[test]
    fn test_total_result_count() {
        let body = r#"{"QueryResult": {"TotalResultCount": 7, "Errors": [], "Results": []}}"#;
        assert_eq!(total_result_count(&response(body)).unwrap(), 7);
        assert!(total_result_count(&response(r#"{"QueryResult": {}}"#)).is_err());
    }

    #[test]
    fn test_extract_errors_prefers_query_result() {
        let json = json!({
            "QueryResult": {"Errors": ["query"]},
            "OperationResult": {"Errors": ["operation"]}
        });
        assert_eq!(extract_errors(&json), ["query".to_string()]);
        assert!(extract_errors(&json!({"User": {}})).is_empty());
    }

    #[test]
    fn test_update_envelope() {
        let mut fields = Map::new();
        fields.insert("Owner".to_string(), json!("/user/1"));
        assert_eq!(
            update_envelope("defect", fields),
            json!({"defect": {"Owner": "/user/1"}})
        );
    }
}
