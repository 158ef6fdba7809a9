//
//  wsapi-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # WSAPI Client Library
//!
//! An async client for the Rally Web Services API (WSAPI).
//!
//! ## Overview
//!
//! A [`Session`] authenticates with an API key or OAuth2 access token sent in
//! the `ZSESSIONID` header, reads subscriptions, projects and users, and maps
//! every response into a typed [`WsapiObject`]. Query resources are paged
//! transparently.
//!
//! ## Features
//!
//! - **Typed Models**: `Subscription`, `User` and `Project`, with a generic fallback
//! - **Transparent Paging**: every page of a query resource, in server order
//! - **Token Refresh**: OAuth2 refresh-and-retry on `401`, with a rotation callback
//! - **Error Classification**: one [`ErrorKind`] per failure class WSAPI reports
//!
//! ## Module Structure
//!
//! - [`session`]: The resource-level facade
//! - [`api`]: Transport, response mapping, classification and paging
//! - [`auth`]: Credentials and the OAuth2 refresh grant
//! - [`models`]: Model registry and typed WSAPI objects
//! - [`config`]: Configuration file and environment handling
//! - [`util`]: Utility functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use wsapi_client::models::WsapiEntity;
//! use wsapi_client::{Config, QueryOptions, Session};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let mut session = Session::from_config(&config, "my-api-key", None)?;
//!
//! let subscription = session.get_user_subscription().await?;
//! println!("Subscription: {:?}", subscription.name());
//!
//! for editor in session.get_editors(1, &QueryOptions::new()).await? {
//!     println!("{:?}", editor.name());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Kinds
//!
//! | Kind | Raised for |
//! |------|------------|
//! | `BadRequest` | `400` |
//! | `Authorization` | `401`, `403` |
//! | `ObjectNotFound` | `200` with "Cannot find object to read" |
//! | `IpLimited` | IP allow-list rejection |
//! | `ApiError` | `500`, `503`, envelope errors, undecodable bodies |
//! | `Timeout` | a request exceeding the session timeout |

/// HTTP transport and response handling for WSAPI.
///
/// Contains the authenticated client, the response mapper, the error
/// classifier and the paginator.
pub mod api;

/// Credentials and OAuth2 token refresh.
pub mod auth;

/// Configuration management.
///
/// Handles loading and saving the TOML configuration file and the
/// `WSAPI_URL` / `WSAPI_AUTH_URL` environment overrides.
pub mod config;

/// Typed WSAPI objects and the model registry.
pub mod models;

/// The resource-level session facade.
pub mod session;

/// Utility functions and helpers.
pub mod util;

pub use api::common::{ApiError, ErrorKind, QueryOptions};
pub use config::Config;
pub use models::WsapiObject;
pub use session::Session;

/// Library version, sent in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
