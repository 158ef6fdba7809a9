//
//  wsapi-client
//  models/user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Rally user model.
//!
//! Users returned by `User`, `TeamMembers` and `Editors` resources share this
//! shape. The display name is assembled from the first and last name rather
//! than read from `_refObjectName`, which WSAPI sometimes fills with the
//! username instead.

use serde_json::Value;

use super::object::{str_field, string_field, RawObject, WsapiEntity};

/// A Rally user.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use wsapi_client::models::{User, WsapiEntity};
///
/// let raw = json!({
///     "UserName": "antti",
///     "FirstName": "Antti",
///     "LastName": "Pitkanen",
///     "EmailAddress": "apitkanen@rallydev.com",
///     "SubscriptionAdmin": true
/// });
/// let user = User::new(raw.as_object().unwrap().clone());
///
/// assert_eq!(user.name().as_deref(), Some("Antti Pitkanen"));
/// assert!(user.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    raw: RawObject,
}

impl User {
    pub fn new(raw: RawObject) -> Self {
        Self { raw }
    }

    pub fn username(&self) -> Option<&str> {
        str_field(&self.raw, "UserName")
    }

    pub fn first_name(&self) -> Option<&str> {
        str_field(&self.raw, "FirstName")
    }

    pub fn last_name(&self) -> Option<&str> {
        str_field(&self.raw, "LastName")
    }

    pub fn email(&self) -> Option<&str> {
        str_field(&self.raw, "EmailAddress")
    }

    pub fn subscription_id(&self) -> Option<String> {
        string_field(&self.raw, "SubscriptionID")
    }

    /// Whether the user administers the subscription (`SubscriptionAdmin`).
    pub fn is_admin(&self) -> bool {
        self.raw
            .get("SubscriptionAdmin")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl WsapiEntity for User {
    fn raw(&self) -> &RawObject {
        &self.raw
    }

    /// `"{first} {last}"`; a missing part renders as an empty string.
    fn name(&self) -> Option<String> {
        Some(format!(
            "{} {}",
            self.first_name().unwrap_or_default(),
            self.last_name().unwrap_or_default()
        ))
    }
}
