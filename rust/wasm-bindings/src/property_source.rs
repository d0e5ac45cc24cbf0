// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property queries against the page's web-ifc instance.

use crate::bridge::{js_error_message, IfcBridge};
use ifc_viewer_core::{
    web_ifc, Attributes, ElementRef, LookupError, ModelId, PropertySet, PropertySource, TypeObject,
};
use js_sys::Promise;
use rustc_hash::FxHashSet;
use serde_json::Value;
use std::cell::RefCell;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

pub struct JsPropertySource {
    bridge: IfcBridge,
    loaded: RefCell<FxHashSet<ModelId>>,
}

impl JsPropertySource {
    pub fn new(bridge: IfcBridge) -> Self {
        Self {
            bridge,
            loaded: RefCell::new(FxHashSet::default()),
        }
    }

    /// Accept queries for `model_id` from now on
    pub fn mark_loaded(&self, model_id: ModelId) {
        self.loaded.borrow_mut().insert(model_id);
    }

    async fn query(&self, promise: Result<Promise, JsValue>) -> Result<Value, LookupError> {
        let promise = promise.map_err(|e| LookupError::Source(js_error_message(&e)))?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| LookupError::Source(js_error_message(&e)))?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| LookupError::MalformedResponse(e.to_string()))
    }
}

impl PropertySource for JsPropertySource {
    fn is_loaded(&self, model_id: ModelId) -> bool {
        self.loaded.borrow().contains(&model_id)
    }

    async fn item_properties(&self, element: ElementRef) -> Result<Attributes, LookupError> {
        let item = self
            .query(self.bridge.get_item_properties(element.model_id, element.element_id))
            .await?;
        if item.is_null() {
            return Err(LookupError::element_not_found(element));
        }
        web_ifc::item_attributes(&item)
    }

    async fn property_sets(&self, element: ElementRef) -> Result<Vec<PropertySet>, LookupError> {
        let sets = self
            .query(self.bridge.get_property_sets(element.model_id, element.element_id))
            .await?;
        web_ifc::property_sets(&sets)
    }

    async fn type_properties(&self, element: ElementRef) -> Result<Vec<TypeObject>, LookupError> {
        let types = self
            .query(self.bridge.get_type_properties(element.model_id, element.element_id))
            .await?;
        web_ifc::type_objects(&types)
    }
}
