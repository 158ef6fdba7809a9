//
//  wsapi-client
//  models/subscription.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Rally subscription model.

use super::object::{integer_field, str_field, string_field, RawObject, WsapiEntity};

/// A Rally subscription, the account-level container for workspaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    raw: RawObject,
}

impl Subscription {
    pub fn new(raw: RawObject) -> Self {
        Self { raw }
    }

    /// The subscription number (`SubscriptionID`), always rendered as a string.
    pub fn subscription_id(&self) -> Option<String> {
        string_field(&self.raw, "SubscriptionID")
    }

    /// The object id (`ObjectID`).
    pub fn object_id(&self) -> Option<i64> {
        integer_field(&self.raw, "ObjectID")
    }

    /// Edition of the subscription, e.g. `"Unlimited"`.
    pub fn subscription_type(&self) -> Option<&str> {
        str_field(&self.raw, "SubscriptionType")
    }
}

impl WsapiEntity for Subscription {
    fn raw(&self) -> &RawObject {
        &self.raw
    }
}
