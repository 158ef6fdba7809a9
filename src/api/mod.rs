//
//  wsapi-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP plumbing behind [`Session`](crate::Session).
//!
//! ## Architecture
//!
//! - [`client`]: Authenticated transport with refresh-and-retry
//! - [`mapper`]: Response envelope decoding into typed objects
//! - [`common`]: Shared types (errors, classification, pagination)
//!
//! A request flows through the layers in this order:
//!
//! ```text
//! Session -> WsapiClient::execute -> classify -> mapper -> WsapiObject
//!                  |
//!                  +-- 401 + refresh bundle -> refresh grant -> resend once
//! ```
//!
//! ## Error Handling
//!
//! API errors are returned as [`ApiError`] values carrying an
//! [`ErrorKind`], the message, the raw response when there was one, and the
//! envelope error list.

/// Authenticated HTTP transport.
///
/// Provides [`WsapiClient`], which handles:
/// - `ZSESSIONID` header injection
/// - Per-request timeouts
/// - OAuth2 refresh-and-retry on `401`
pub mod client;

/// Shared types: errors, response classification and pagination.
pub mod common;

/// Response envelope decoding.
pub mod mapper;

pub use client::{WsapiClient, WsapiRequest};
pub use common::{ApiError, ErrorKind, RawResponse};
