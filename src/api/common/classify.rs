//
//  wsapi-client
//  api/common/classify.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Response classification.
//!
//! WSAPI does not always use status codes to signal failure. A missing object
//! comes back as `200 OK` with an `OperationResult` error, and an IP
//! restriction is an HTML page served under an arbitrary status. [`classify`]
//! folds these conventions into [`ApiError`] values.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! | # | Condition | Result |
//! |---|-----------|--------|
//! | 1 | status 400 | `BadRequest` |
//! | 2 | status 401 or 403 | `Authorization` |
//! | 3 | status 500 | `ApiError` ("Internal server error") |
//! | 4 | status 503 | `ApiError` ("Service unavailable") |
//! | 5 | status 200 and `OperationResult.Errors[0]` contains "Cannot find object to read" | `ObjectNotFound` |
//! | 6 | status > 401 and body carries the IP restriction message | `IpLimited` |
//! | 7 | anything else | no error |

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{ApiError, RawResponse};

const OBJECT_NOT_FOUND_MESSAGE: &str = "Cannot find object to read";

/// Matches the page Rally serves when the caller's IP is outside the
/// subscription's allowed range.
static IP_LIMIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Your IP address, (?:\d+\.?)+, is not within the allowed range that your subscription administrator has configured\.",
    )
    .unwrap()
});

/// Classifies a final HTTP response.
///
/// Returns `None` when the response should be handed to the response mapper,
/// which may still reject a malformed or error-carrying envelope.
///
/// # Example
///
/// ```rust
/// use wsapi_client::api::common::{classify, ErrorKind, RawResponse};
///
/// let forbidden = RawResponse::new(403, "https://example.com", "");
/// assert_eq!(classify(&forbidden).map(|e| e.kind()), Some(ErrorKind::Authorization));
///
/// let ok = RawResponse::new(200, "https://example.com", r#"{"User": {}}"#);
/// assert!(classify(&ok).is_none());
/// ```
pub fn classify(response: &RawResponse) -> Option<ApiError> {
    let status = response.status;

    match status {
        400 => return Some(ApiError::bad_request("Bad request", Some(response.clone()))),
        401 | 403 => {
            return Some(ApiError::authorization("Unauthorized", Some(response.clone())))
        }
        500 => {
            return Some(ApiError::api_error(
                "Internal server error",
                Some(response.clone()),
            ))
        }
        503 => {
            return Some(ApiError::api_error(
                "Service unavailable",
                Some(response.clone()),
            ))
        }
        _ => {}
    }

    if is_object_not_found(response) {
        return Some(ApiError::object_not_found(
            "Object not found",
            Some(response.clone()),
        ));
    }

    if is_ip_address_limited(response) {
        return Some(ApiError::ip_limited(
            "IP Address limited",
            Some(response.clone()),
        ));
    }

    None
}

fn is_object_not_found(response: &RawResponse) -> bool {
    if response.status != 200 {
        return false;
    }

    // Bodies that are not JSON are left for the mapper to report.
    let Ok(json) = serde_json::from_str::<Value>(&response.body) else {
        return false;
    };

    json.get("OperationResult")
        .and_then(|result| result.get("Errors"))
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(Value::as_str)
        .is_some_and(|error| error.contains(OBJECT_NOT_FOUND_MESSAGE))
}

fn is_ip_address_limited(response: &RawResponse) -> bool {
    response.status > 401 && IP_LIMIT_PATTERN.is_match(&response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ErrorKind;

    const IP_PAGE: &str = "<html><body><p>Your IP address, 192.168.10.1, is not within the \
        allowed range that your subscription administrator has configured.</p></body></html>";

    fn kind_of(status: u16, body: &str) -> Option<ErrorKind> {
        classify(&RawResponse::new(status, "https://example.com", body)).map(|e| e.kind())
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(kind_of(400, ""), Some(ErrorKind::BadRequest));
        assert_eq!(kind_of(401, ""), Some(ErrorKind::Authorization));
        assert_eq!(kind_of(403, ""), Some(ErrorKind::Authorization));
        assert_eq!(kind_of(500, ""), Some(ErrorKind::ApiError));
        assert_eq!(kind_of(503, ""), Some(ErrorKind::ApiError));
        assert_eq!(kind_of(200, r#"{"User": {}}"#), None);
    }

    #[test]
    fn test_server_error_messages() {
        let err = classify(&RawResponse::new(503, "u", "")).unwrap();
        assert_eq!(err.message(), "Service unavailable");
        let err = classify(&RawResponse::new(500, "u", "")).unwrap();
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_object_not_found_embedded_in_200() {
        let body = r#"{"OperationResult": {"Errors": ["Cannot find object to read"], "Warnings": []}}"#;
        assert_eq!(kind_of(200, body), Some(ErrorKind::ObjectNotFound));
    }

    #[test]
    fn test_object_not_found_only_checks_first_error() {
        let body = r#"{"OperationResult": {"Errors": ["Other", "Cannot find object to read"]}}"#;
        assert_eq!(kind_of(200, body), None);
    }

    #[test]
    fn test_object_not_found_requires_status_200() {
        let body = r#"{"OperationResult": {"Errors": ["Cannot find object to read"]}}"#;
        assert_eq!(kind_of(404, body), None);
    }

    #[test]
    fn test_invalid_json_is_not_classified() {
        assert_eq!(kind_of(200, "{invalid_json: "), None);
        assert_eq!(kind_of(423, "{invalid_json: "), None);
    }

    #[test]
    fn test_ip_address_limited_at_unusual_status() {
        assert_eq!(kind_of(404, IP_PAGE), Some(ErrorKind::IpLimited));
        assert_eq!(kind_of(402, IP_PAGE), Some(ErrorKind::IpLimited));
    }

    #[test]
    fn test_ip_address_message_ignored_below_402() {
        assert_eq!(kind_of(200, IP_PAGE), None);
    }

    #[test]
    fn test_status_rules_take_priority_over_body() {
        assert_eq!(kind_of(403, IP_PAGE), Some(ErrorKind::Authorization));
        assert_eq!(kind_of(500, IP_PAGE), Some(ErrorKind::ApiError));
    }
}
