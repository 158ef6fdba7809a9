//
//  wsapi-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport for WSAPI
//!
//! This module provides the transport layer used by [`Session`](crate::Session).
//! It owns the HTTP client, the current credential and the optional OAuth2
//! refresh bundle.
//!
//! ## Features
//!
//! - `ZSESSIONID` header injection from the current credential
//! - Per-request timeout, reported as [`ErrorKind::Timeout`](super::common::ErrorKind::Timeout)
//! - Transparent refresh-and-retry on `401` when a refresh bundle is set
//! - Response classification against the final response only
//!
//! ## Refresh protocol
//!
//! When a request comes back `401` and a [`RefreshBundle`] is configured, the
//! client performs the refresh-token grant, installs the new access token as
//! the credential, and resends the identical request once. Whatever the retry
//! returns is final; a second `401` is reported as an authorization error.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, info};

use super::common::{classify, ApiError, RawResponse, Result};
use crate::auth::{refresh_access_token, Credential, RefreshBundle, DEFAULT_AUTH_URL};
use crate::util::truncate;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One WSAPI request, kept as data so it can be resent after a refresh.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use wsapi_client::api::client::WsapiRequest;
///
/// let get = WsapiRequest::get("https://example.com/v3.0/User")
///     .param("start", "1")
///     .param("pagesize", "200");
/// assert_eq!(get.params.len(), 2);
///
/// let post = WsapiRequest::post("https://example.com/v3.0/defect/1", json!({"defect": {}}));
/// assert!(post.body.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WsapiRequest {
    pub method: Method,
    pub url: String,
    /// Query string parameters, sent in order.
    pub params: Vec<(String, String)>,
    /// JSON body, for writes.
    pub body: Option<Value>,
}

impl WsapiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            params: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }
}

/// The authenticated HTTP transport.
///
/// A client holds exactly one [`reqwest::Client`] and one current
/// [`Credential`]. The credential is read at send time, so a refresh is
/// visible to every later request without rebuilding the client.
///
/// Methods that may refresh take `&mut self`; sharing one client between
/// concurrent tasks needs external synchronization.
///
/// # Example
///
/// ```rust,no_run
/// use wsapi_client::api::client::{WsapiClient, WsapiRequest};
/// use wsapi_client::auth::Credential;
///
/// # async fn example() -> wsapi_client::api::common::Result<()> {
/// let mut client = WsapiClient::new(Credential::new("my-api-key"))?;
/// let response = client
///     .execute(&WsapiRequest::get("https://rally1.rallydev.com/slm/webservice/v3.0/User"))
///     .await?;
/// println!("{}", response.body);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WsapiClient {
    /// The underlying HTTP client
    http: Client,
    /// The credential sent as `ZSESSIONID`
    credential: Credential,
    /// OAuth2 refresh configuration, if any
    refresh: Option<RefreshBundle>,
    /// Token endpoint used for refreshes
    auth_url: String,
    /// Per-request timeout
    timeout: Duration,
}

impl WsapiClient {
    /// Creates a client with the default timeout and token endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client could not be created.
    pub fn new(credential: Credential) -> Result<Self> {
        Ok(Self {
            http: Client::builder()
                .user_agent(format!("wsapi-client/{}", crate::VERSION))
                .build()?,
            credential,
            refresh: None,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Enables refresh-and-retry on `401`.
    pub fn set_refresh_bundle(&mut self, bundle: RefreshBundle) {
        self.refresh = Some(bundle);
    }

    pub fn refresh_bundle(&self) -> Option<&RefreshBundle> {
        self.refresh.as_ref()
    }

    /// The credential currently attached to requests.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = credential;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a request and classifies the final response.
    ///
    /// # Errors
    ///
    /// Returns the classified error for the final response, a `Timeout`
    /// error, or the error of a failed refresh.
    pub async fn execute(&mut self, request: &WsapiRequest) -> Result<RawResponse> {
        let response = self.send_with_refresh(request).await?;

        if let Some(err) = classify(&response) {
            debug!(status = response.status, kind = %err.kind(), "request failed");
            return Err(err);
        }

        Ok(response)
    }

    /// Sends a request, refreshing the credential and retrying once on `401`
    /// when a refresh bundle is configured. The response is not classified.
    pub async fn send_with_refresh(&mut self, request: &WsapiRequest) -> Result<RawResponse> {
        let response = self.send(request).await?;

        if response.status != 401 || self.refresh.is_none() {
            return Ok(response);
        }

        info!(url = %request.url, "request unauthorized, refreshing access token");
        self.refresh_credential().await?;
        self.send(request).await
    }

    /// Runs the refresh-token grant and installs the new access token.
    /// Callers check that a bundle is configured.
    async fn refresh_credential(&mut self) -> Result<()> {
        let Some(bundle) = self.refresh.as_mut() else {
            return Err(ApiError::authorization("No refresh token configured", None));
        };

        let tokens = refresh_access_token(&self.http, &self.auth_url, bundle, self.timeout).await?;
        self.credential = Credential::new(tokens.access_token.clone());
        bundle.rotate(&tokens);
        Ok(())
    }

    /// Sends a request once with the current credential.
    async fn send(&self, request: &WsapiRequest) -> Result<RawResponse> {
        debug!(method = %request.method, url = %request.url, params = ?request.params, "sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .timeout(self.timeout);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder = self.credential.apply_to_request(builder);

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, body = %truncate(&body, 200), "received response");

        Ok(RawResponse {
            status,
            url: request.url.clone(),
            body,
        })
    }
}
