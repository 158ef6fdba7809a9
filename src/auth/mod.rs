//
//  wsapi-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! WSAPI authenticates every request with a `ZSESSIONID` header. The value is
//! opaque to this crate: it may be an API key, a session id, or an OAuth2
//! access token.
//!
//! When the credential is an OAuth2 access token, a [`RefreshBundle`] lets the
//! transport obtain a new one transparently after a `401`. Rally issues
//! rotating refresh tokens, so the bundle's refresh token is replaced on every
//! successful refresh and an optional callback is told about the new tokens so
//! the caller can persist them.
//!
//! ## Module Structure
//!
//! - [`oauth`]: The refresh-token grant against the Rally token endpoint
//!
//! ## Example
//!
//! ```rust
//! use wsapi_client::auth::{Credential, RefreshBundle};
//!
//! let credential = Credential::new("deadbeefdeadbeef");
//! let bundle = RefreshBundle::new("client-id", "client-secret", "refresh-token")
//!     .on_rotate(|tokens| println!("new refresh token: {:?}", tokens.refresh_token));
//!
//! assert_eq!(credential.as_str(), "deadbeefdeadbeef");
//! assert_eq!(bundle.refresh_token(), "refresh-token");
//! ```

mod oauth;

pub use oauth::*;

use std::fmt;

use reqwest::RequestBuilder;

use crate::util::mask_secret;

/// Header carrying the session credential on every WSAPI request.
pub const SESSION_HEADER: &str = "ZSESSIONID";

/// The credential attached to outgoing requests.
///
/// `Debug` output is masked so credentials do not leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Adds the `ZSESSIONID` header to a request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(SESSION_HEADER, &self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&mask_secret(&self.0)).finish()
    }
}

/// Callback invoked with the token endpoint response after each refresh.
pub type TokenCallback = Box<dyn Fn(&TokenResponse) + Send + Sync>;

/// OAuth2 client credentials plus the current refresh token.
pub struct RefreshBundle {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    on_rotate: Option<TokenCallback>,
}

impl RefreshBundle {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            on_rotate: None,
        }
    }

    /// Registers a callback that receives every successful token response.
    ///
    /// The callback runs synchronously inside the request that triggered the
    /// refresh, before the original request is retried.
    pub fn on_rotate<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TokenResponse) + Send + Sync + 'static,
    {
        self.on_rotate = Some(Box::new(callback));
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Stores the refresh token from `tokens` and notifies the callback.
    ///
    /// The stored token is overwritten even when unchanged; it is kept only
    /// when the response omits `refresh_token` altogether.
    pub fn rotate(&mut self, tokens: &TokenResponse) {
        if let Some(refresh_token) = &tokens.refresh_token {
            self.refresh_token = refresh_token.clone();
        }
        if let Some(callback) = &self.on_rotate {
            callback(tokens);
        }
    }
}

impl fmt::Debug for RefreshBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshBundle")
            .field("client_id", &self.client_id)
            .field("client_secret", &mask_secret(&self.client_secret))
            .field("refresh_token", &mask_secret(&self.refresh_token))
            .field("on_rotate", &self.on_rotate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn tokens(refresh_token: Option<&str>) -> TokenResponse {
        let body = match refresh_token {
            Some(token) => format!(r#"{{"access_token": "a", "refresh_token": "{}"}}"#, token),
            None => r#"{"access_token": "a"}"#.to_string(),
        };
        serde_json::from_str(&body).unwrap()
    }

    #[test]
    fn test_credential_debug_is_masked() {
        let credential = Credential::new("deadbeefdeadbeef");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("deadbeefdeadbeef"));
    }

    #[test]
    fn test_rotate_replaces_refresh_token() {
        let mut bundle = RefreshBundle::new("id", "secret", "old");
        bundle.rotate(&tokens(Some("new")));
        assert_eq!(bundle.refresh_token(), "new");
    }

    #[test]
    fn test_rotate_keeps_token_when_absent() {
        let mut bundle = RefreshBundle::new("id", "secret", "old");
        bundle.rotate(&tokens(None));
        assert_eq!(bundle.refresh_token(), "old");
    }

    #[test]
    fn test_rotate_invokes_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut bundle = RefreshBundle::new("id", "secret", "old")
            .on_rotate(move |tokens| sink.lock().unwrap().push(tokens.access_token.clone()));

        bundle.rotate(&tokens(Some("new")));

        assert_eq!(*seen.lock().unwrap(), ["a".to_string()]);
    }

    #[test]
    fn test_bundle_debug_hides_secrets() {
        let bundle = RefreshBundle::new("id", "supersecretvalue", "refreshtokenvalue");
        let debug = format!("{:?}", bundle);
        assert!(debug.contains("id"));
        assert!(!debug.contains("supersecretvalue"));
        assert!(!debug.contains("refreshtokenvalue"));
    }
}
