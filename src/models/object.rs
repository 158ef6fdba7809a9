//
//  wsapi-client
//  models/object.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The generic WSAPI object and the accessors every typed model shares.

use serde_json::{Map, Value};

/// Decoded JSON attributes of one API-side entity.
pub type RawObject = Map<String, Value>;

/// Read-only accessors shared by every WSAPI model.
///
/// Implementors only provide [`raw`](Self::raw); the remaining methods read
/// the standard WSAPI reference fields. Models may override any of them, as
/// [`User`](super::User) does for [`name`](Self::name).
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use wsapi_client::models::{Object, WsapiEntity};
///
/// let raw = json!({
///     "_refObjectName": "Rally Development",
///     "_ref": "https://rally1.rallydev.com/slm/webservice/v3.0/Project/1",
///     "ObjectID": 1,
///     "Workspace": {"_refObjectName": "Engineering"}
/// });
/// let object = Object::new(raw.as_object().unwrap().clone());
///
/// assert_eq!(object.name().as_deref(), Some("Rally Development"));
/// assert_eq!(object.id(), Some(1));
/// assert_eq!(object.workspace(), Some("Engineering"));
/// ```
pub trait WsapiEntity {
    /// The attributes this model wraps.
    fn raw(&self) -> &RawObject;

    /// Display name (`_refObjectName`).
    fn name(&self) -> Option<String> {
        str_field(self.raw(), "_refObjectName").map(str::to_string)
    }

    /// Numeric object id (`ObjectID`).
    fn id(&self) -> Option<i64> {
        integer_field(self.raw(), "ObjectID")
    }

    /// Absolute resource URL (`_ref`).
    fn url(&self) -> Option<&str> {
        str_field(self.raw(), "_ref")
    }

    /// Name of the owning workspace (`Workspace._refObjectName`).
    fn workspace(&self) -> Option<&str> {
        self.raw()
            .get("Workspace")
            .and_then(|workspace| workspace.get("_refObjectName"))
            .and_then(Value::as_str)
    }
}

/// Fallback model for any type tag without a dedicated wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    raw: RawObject,
}

impl Object {
    pub fn new(raw: RawObject) -> Self {
        Self { raw }
    }

    /// Consumes the wrapper and returns its attributes.
    pub fn into_raw(self) -> RawObject {
        self.raw
    }
}

impl WsapiEntity for Object {
    fn raw(&self) -> &RawObject {
        &self.raw
    }
}

pub(crate) fn str_field<'a>(raw: &'a RawObject, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

/// Reads an integer that WSAPI may send either as a number or a string.
pub(crate) fn integer_field(raw: &RawObject, key: &str) -> Option<i64> {
    match raw.get(key)? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

/// Renders a scalar field as a string, the way ids are shown to users.
pub(crate) fn string_field(raw: &RawObject, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
