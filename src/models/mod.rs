//
//  wsapi-client
//  models/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Typed WSAPI Models
//!
//! WSAPI responses identify each entity by a type tag: the `_type` field of a
//! query result, or the sole top-level key of a single-object response. This
//! module turns a tag plus its decoded attributes into a [`WsapiObject`].
//!
//! ## Registry
//!
//! | Tag | Variant |
//! |-----|---------|
//! | `Subscription` | [`WsapiObject::Subscription`] |
//! | `User` | [`WsapiObject::User`] |
//! | `Project` | [`WsapiObject::Project`] |
//! | anything else, or no tag | [`WsapiObject::Object`] |
//!
//! Resolution never fails: an unknown tag is the ordinary case for the many
//! artifact types (defects, stories, tasks) that have no dedicated model.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use wsapi_client::models::{resolve, WsapiEntity, WsapiObject};
//!
//! let raw = json!({"FirstName": "Antti", "LastName": "Pitkanen"});
//! let object = resolve(Some("User"), raw.as_object().unwrap().clone());
//!
//! assert!(matches!(object, WsapiObject::User(_)));
//! assert_eq!(object.name().as_deref(), Some("Antti Pitkanen"));
//!
//! let defect = resolve(Some("Defect"), Default::default());
//! assert!(matches!(defect, WsapiObject::Object(_)));
//! ```

mod object;
mod project;
mod subscription;
mod user;

pub use object::{Object, RawObject, WsapiEntity};
pub use project::Project;
pub use subscription::Subscription;
pub use user::User;

/// A decoded WSAPI entity, tagged by model.
#[derive(Debug, Clone, PartialEq)]
pub enum WsapiObject {
    /// Any entity without a dedicated model.
    Object(Object),
    Subscription(Subscription),
    User(User),
    Project(Project),
}

type Constructor = fn(RawObject) -> WsapiObject;

/// Known type tags and the model each one constructs.
const REGISTRY: &[(&str, Constructor)] = &[
    ("Object", new_object),
    ("Subscription", new_subscription),
    ("User", new_user),
    ("Project", new_project),
];

fn new_object(raw: RawObject) -> WsapiObject {
    WsapiObject::Object(Object::new(raw))
}

fn new_subscription(raw: RawObject) -> WsapiObject {
    WsapiObject::Subscription(Subscription::new(raw))
}

fn new_user(raw: RawObject) -> WsapiObject {
    WsapiObject::User(User::new(raw))
}

fn new_project(raw: RawObject) -> WsapiObject {
    WsapiObject::Project(Project::new(raw))
}

/// Builds the model registered for `type_tag`, or a generic [`Object`].
pub fn resolve(type_tag: Option<&str>, raw: RawObject) -> WsapiObject {
    let constructor = type_tag.and_then(|tag| {
        REGISTRY
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, constructor)| *constructor)
    });

    match constructor {
        Some(constructor) => constructor(raw),
        None => WsapiObject::Object(Object::new(raw)),
    }
}

impl WsapiObject {
    /// The registry tag of the variant this object resolved to.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Object(_) => "Object",
            Self::Subscription(_) => "Subscription",
            Self::User(_) => "User",
            Self::Project(_) => "Project",
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_subscription(&self) -> Option<&Subscription> {
        match self {
            Self::Subscription(subscription) => Some(subscription),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&Project> {
        match self {
            Self::Project(project) => Some(project),
            _ => None,
        }
    }

    fn entity(&self) -> &dyn WsapiEntity {
        match self {
            Self::Object(object) => object,
            Self::Subscription(subscription) => subscription,
            Self::User(user) => user,
            Self::Project(project) => project,
        }
    }
}

// Delegates to the wrapped model so overrides such as `User::name` apply.
impl WsapiEntity for WsapiObject {
    fn raw(&self) -> &RawObject {
        self.entity().raw()
    }

    fn name(&self) -> Option<String> {
        self.entity().name()
    }

    fn id(&self) -> Option<i64> {
        self.entity().id()
    }

    fn url(&self) -> Option<&str> {
        self.entity().url()
    }

    fn workspace(&self) -> Option<&str> {
        self.entity().workspace()
    }
}
