//
//  wsapi-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads the settings a [`Session`](crate::Session) needs from a TOML file in
//! the platform config directory, with environment overrides for the two
//! endpoint URLs.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/wsapi/config.toml`
//! - **macOS**: `~/Library/Application Support/wsapi/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\wsapi\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! wsapi_url = "https://rally1.rallydev.com/slm/webservice/"
//! api_version = "3.0"
//! workspace_id = "12345"
//! timeout_secs = 30
//!
//! [oauth]
//! client_id = "my-client"
//! client_secret = "my-secret"
//! ```
//!
//! ## Environment
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `WSAPI_URL` | `wsapi_url` |
//! | `WSAPI_AUTH_URL` | `auth_url` |
//!
//! Access tokens and refresh tokens are never read from or written to this
//! file; callers supply them when creating a session.

mod file;

pub use file::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::DEFAULT_AUTH_URL;
use crate::session::DEFAULT_API_VERSION;

/// Production WSAPI base URL.
pub const DEFAULT_WSAPI_URL: &str = "https://rally1.rallydev.com/slm/webservice/";

/// Environment variable overriding the WSAPI base URL.
pub const WSAPI_URL_ENV: &str = "WSAPI_URL";

/// Environment variable overriding the token endpoint.
pub const WSAPI_AUTH_URL_ENV: &str = "WSAPI_AUTH_URL";

/// The WSAPI base URL: `WSAPI_URL` when set, otherwise production.
pub fn default_wsapi_url() -> String {
    std::env::var(WSAPI_URL_ENV).unwrap_or_else(|_| DEFAULT_WSAPI_URL.to_string())
}

/// The token endpoint: `WSAPI_AUTH_URL` when set, otherwise production.
pub fn default_auth_url() -> String {
    std::env::var(WSAPI_AUTH_URL_ENV).unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

/// Client configuration.
///
/// All fields have defaults, so an empty file is a valid configuration.
///
/// # Example
///
/// ```rust
/// use wsapi_client::config::Config;
///
/// let config = Config::from_toml_str("workspace_id = \"42\"\ntimeout_secs = 10").unwrap();
/// assert_eq!(config.workspace_id.as_deref(), Some("42"));
/// assert_eq!(config.api_version, "3.0");
/// assert_eq!(config.timeout().as_secs(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the WSAPI service.
    #[serde(default = "default_wsapi_url")]
    pub wsapi_url: String,

    /// OAuth2 token endpoint.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// WSAPI version, without the leading `v`.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Workspace to scope every query to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// OAuth client credentials used for token refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthClientConfig>,
}

/// OAuth2 client registered with Rally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wsapi_url: default_wsapi_url(),
            auth_url: default_auth_url(),
            api_version: default_api_version(),
            workspace_id: None,
            timeout_secs: default_timeout_secs(),
            oauth: None,
        }
    }
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields the defaults. `WSAPI_URL` and `WSAPI_AUTH_URL`
    /// take precedence over the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if config_exists(&path) {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Loads the configuration from `path` without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = read_config_file(path)?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "wsapi")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Checks that both endpoint URLs parse and the timeout is non-zero.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.wsapi_url)
            .with_context(|| format!("Invalid wsapi_url: {}", self.wsapi_url))?;
        Url::parse(&self.auth_url)
            .with_context(|| format!("Invalid auth_url: {}", self.auth_url))?;
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(WSAPI_URL_ENV) {
            self.wsapi_url = url;
        }
        if let Ok(url) = std::env::var(WSAPI_AUTH_URL_ENV) {
            self.auth_url = url;
        }
    }
}
