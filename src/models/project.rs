//
//  wsapi-client
//  models/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use super::object::{RawObject, WsapiEntity};

/// A Rally project. Exposes the generic accessors only.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    raw: RawObject,
}

impl Project {
    pub fn new(raw: RawObject) -> Self {
        Self { raw }
    }
}

impl WsapiEntity for Project {
    fn raw(&self) -> &RawObject {
        &self.raw
    }
}
