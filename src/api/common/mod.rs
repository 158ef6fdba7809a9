//
//  wsapi-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the WSAPI client
//!
//! This module provides the types shared by every layer of the client: the
//! error taxonomy, the raw HTTP response captured by the transport, and the
//! submodules that classify responses and drive pagination.
//!
//! # Overview
//!
//! - [`ApiError`] - The single error type surfaced by every API operation
//! - [`ErrorKind`] - The closed set of error categories callers match on
//! - [`RawResponse`] - Status, URL and body of one HTTP exchange
//! - [`classify`] - Maps a status code and body to an optional [`ApiError`]
//! - Pagination types (re-exported from the `pagination` submodule)
//!
//! # Example
//!
//! ```rust
//! use wsapi_client::api::common::{ApiError, ErrorKind};
//!
//! fn describe(err: &ApiError) -> &'static str {
//!     match err.kind() {
//!         ErrorKind::Authorization => "please log in again",
//!         ErrorKind::ObjectNotFound => "no such object",
//!         ErrorKind::Timeout => "the server did not answer in time",
//!         _ => "the request failed",
//!     }
//! }
//!
//! let err = ApiError::authorization("Unauthorized", None);
//! assert_eq!(describe(&err), "please log in again");
//! ```

use std::fmt;

use thiserror::Error;

mod classify;
mod pagination;

pub use classify::*;
pub use pagination::*;

/// Result alias used throughout the API layer.
pub type Result<T> = std::result::Result<T, ApiError>;

/// The category of an [`ApiError`].
///
/// | Variant | Raised when |
/// |---------|-------------|
/// | `BadRequest` | HTTP 400 |
/// | `Authorization` | HTTP 401 or 403 (after any refresh attempt) |
/// | `ObjectNotFound` | HTTP 200 carrying a "Cannot find object to read" error |
/// | `IpLimited` | The body reports the caller's IP is outside the allowed range |
/// | `ApiError` | 500/503, malformed JSON, or an envelope carrying errors |
/// | `Timeout` | The HTTP round-trip exceeded the configured timeout |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The server rejected the request parameters.
    BadRequest,
    /// The credential was missing, expired or lacked permission.
    Authorization,
    /// The requested object does not exist.
    ObjectNotFound,
    /// The subscription does not allow requests from this IP address.
    IpLimited,
    /// Generic server or envelope failure.
    ApiError,
    /// The transport gave up waiting for a response.
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BadRequest => "bad request",
            Self::Authorization => "authorization error",
            Self::ObjectNotFound => "object not found",
            Self::IpLimited => "IP address limited",
            Self::ApiError => "API error",
            Self::Timeout => "timeout",
        };
        f.write_str(label)
    }
}

/// One HTTP exchange as seen by the classifier and the mapper.
///
/// The body is read eagerly so that both the error classifier and the
/// response mapper can inspect it without consuming the underlying stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code of the final response.
    pub status: u16,
    /// The URL the request was sent to, without query parameters.
    pub url: String,
    /// The response body as text.
    pub body: String,
}

impl RawResponse {
    /// Creates a response value, mostly useful for tests and custom page sources.
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error returned by every WSAPI operation.
///
/// All failures share one payload shape: a [`ErrorKind`], a human readable
/// message, the raw response when one was received, and the list of errors
/// reported inside the JSON envelope (empty when the failure was not an
/// envelope error).
///
/// # Example
///
/// ```rust
/// use wsapi_client::api::common::{ApiError, ErrorKind, RawResponse};
///
/// let response = RawResponse::new(500, "https://example.com/v3.0/User", "");
/// let err = ApiError::api_error("Internal server error", Some(response));
///
/// assert_eq!(err.kind(), ErrorKind::ApiError);
/// assert_eq!(err.response().map(|r| r.status), Some(500));
/// assert_eq!(err.to_string(), "API error: Internal server error");
/// ```
#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    response: Option<RawResponse>,
    errors: Vec<String>,
}

impl ApiError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>, response: Option<RawResponse>) -> Self {
        Self {
            kind,
            message: message.into(),
            response,
            errors: Vec::new(),
        }
    }

    /// Creates a [`ErrorKind::BadRequest`] error.
    pub fn bad_request(message: impl Into<String>, response: Option<RawResponse>) -> Self {
        Self::new(ErrorKind::BadRequest, message, response)
    }

    /// Creates a [`ErrorKind::Authorization`] error.
    pub fn authorization(message: impl Into<String>, response: Option<RawResponse>) -> Self {
        Self::new(ErrorKind::Authorization, message, response)
    }

    /// Creates a [`ErrorKind::ObjectNotFound`] error.
    pub fn object_not_found(message: impl Into<String>, response: Option<RawResponse>) -> Self {
        Self::new(ErrorKind::ObjectNotFound, message, response)
    }

    /// Creates a [`ErrorKind::IpLimited`] error.
    pub fn ip_limited(message: impl Into<String>, response: Option<RawResponse>) -> Self {
        Self::new(ErrorKind::IpLimited, message, response)
    }

    /// Creates a generic [`ErrorKind::ApiError`].
    pub fn api_error(message: impl Into<String>, response: Option<RawResponse>) -> Self {
        Self::new(ErrorKind::ApiError, message, response)
    }

    /// Creates a [`ErrorKind::Timeout`] error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message, None)
    }

    /// Creates an [`ErrorKind::ApiError`] describing the errors found in a
    /// response envelope. The message renders the list the same way the
    /// server sent it, e.g. `Errors: ["Could not parse query"]`.
    pub fn envelope(errors: Vec<String>, response: &RawResponse) -> Self {
        Self {
            kind: ErrorKind::ApiError,
            message: format!("Errors: {:?}", errors),
            response: Some(response.clone()),
            errors,
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human readable message, without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The response that caused this error, if one was received.
    pub fn response(&self) -> Option<&RawResponse> {
        self.response.as_ref()
    }

    /// Errors reported inside the JSON envelope.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_authorization(&self) -> bool {
        self.kind == ErrorKind::Authorization
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("Request timed out: {}", err))
        } else {
            Self::api_error(format!("Request failed: {}", err), None)
        }
    }
}
