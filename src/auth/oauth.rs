//
//  wsapi-client
//  auth/oauth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # OAuth 2.0 Refresh Grant
//!
//! Exchanges a refresh token for a new access token at the Rally token
//! endpoint. The request is a form-encoded POST:
//!
//! ```text
//! grant_type=refresh_token&refresh_token=...&client_id=...&client_secret=...
//! ```
//!
//! and the endpoint answers with JSON such as
//!
//! ```json
//! {"access_token": "...", "refresh_token": "...", "token_type": "Bearer", "expires_in": 15552000}
//! ```
//!
//! The response goes through the same [`classify`] step as any WSAPI
//! response, so a rejected refresh token surfaces as `BadRequest` or
//! `Authorization`.
//!
//! ## Notes
//!
//! - Rally rotates refresh tokens; always keep the one from the latest response
//! - The access token obtained here becomes the new `ZSESSIONID` value

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::RefreshBundle;
use crate::api::common::{classify, ApiError, RawResponse, Result};
use crate::util::mask_secret;

/// Rally's OAuth2 token endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://rally1.rallydev.com/login/oauth2/token";

/// A decoded token endpoint response.
///
/// Fields the crate does not interpret are kept in `extra`, so serializing
/// the value reproduces the full document the server sent.
///
/// # Example
///
/// ```rust
/// use wsapi_client::auth::TokenResponse;
///
/// let body = r#"{"access_token": "new", "refresh_token": "next", "expires_in": 3600, "scope": "alm"}"#;
/// let tokens: TokenResponse = serde_json::from_str(body).unwrap();
///
/// assert_eq!(tokens.access_token, "new");
/// assert_eq!(tokens.extra["scope"], "alm");
/// assert!(tokens.expires_at().is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The new access token, used as the session credential.
    pub access_token: String,

    /// The rotated refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Usually `"Bearer"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Access token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    /// Any other fields returned by the endpoint.
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// When this response was decoded.
    #[serde(skip, default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl TokenResponse {
    /// When the access token expires, if the endpoint reported a lifetime.
    ///
    /// Lifetimes too large to represent yield `None`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.expires_in?).ok()?;
        let lifetime = chrono::Duration::try_seconds(seconds)?;
        self.received_at.checked_add_signed(lifetime)
    }

    /// The full response as JSON.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Performs the refresh-token grant.
///
/// The bundle is not modified; the caller installs the new access token and
/// calls [`RefreshBundle::rotate`].
///
/// # Errors
///
/// - `Timeout` when the endpoint does not answer within `timeout`
/// - whatever [`classify`] reports for the token endpoint's response
/// - `ApiError` when the body is not a JSON token response
pub async fn refresh_access_token(
    http: &Client,
    auth_url: &str,
    bundle: &RefreshBundle,
    timeout: Duration,
) -> Result<TokenResponse> {
    debug!(
        auth_url,
        client_id = bundle.client_id(),
        refresh_token = %mask_secret(bundle.refresh_token()),
        "refreshing access token"
    );

    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", bundle.refresh_token()),
        ("client_id", bundle.client_id()),
        ("client_secret", bundle.client_secret()),
    ];

    let response = http
        .post(auth_url)
        .timeout(timeout)
        .form(&params)
        .send()
        .await?;

    let response = RawResponse {
        status: response.status().as_u16(),
        url: auth_url.to_string(),
        body: response.text().await?,
    };

    if let Some(err) = classify(&response) {
        return Err(err);
    }

    let tokens: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
        ApiError::api_error(
            format!("Invalid token response ({}): {}", e, response.body),
            Some(response.clone()),
        )
    })?;

    info!(
        access_token = %mask_secret(&tokens.access_token),
        rotated = tokens.refresh_token.is_some(),
        "access token refreshed"
    );

    Ok(tokens)
}
