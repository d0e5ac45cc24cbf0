// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model loading through the page's web-ifc loader.

use crate::bridge::{js_error_message, IfcBridge};
use ifc_viewer_core::{GeometryBuffer, LoadError, LoadProgress, Model, ModelLoader};
use js_sys::{Reflect, Uint32Array};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

pub struct JsModelLoader {
    bridge: IfcBridge,
    /// Progress callback of the latest load, kept until the next load starts
    progress: RefCell<Option<Closure<dyn FnMut(f64, f64)>>>,
}

impl JsModelLoader {
    pub fn new(bridge: IfcBridge) -> Self {
        Self {
            bridge,
            progress: RefCell::new(None),
        }
    }
}

impl ModelLoader for JsModelLoader {
    async fn load<F>(&self, url: &str, mut on_progress: F) -> Result<Model, LoadError>
    where
        F: FnMut(LoadProgress) + 'static,
    {
        let failed = |reason: String| LoadError::Failed {
            url: url.to_string(),
            reason,
        };

        let progress = Closure::<dyn FnMut(f64, f64)>::new(move |loaded: f64, total: f64| {
            on_progress(LoadProgress::new(byte_count(loaded), byte_count(total)));
        });

        let promise = self
            .bridge
            .load_model(url, &progress)
            .map_err(|e| failed(js_error_message(&e)))?;
        // Late progress calls after the promise settles stay valid
        self.progress.replace(Some(progress));

        let loaded = JsFuture::from(promise)
            .await
            .map_err(|e| failed(js_error_message(&e)))?;

        Ok(model_from_js(&loaded)?.with_source(url))
    }
}

/// Progress counts arrive as JS numbers
fn byte_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

/// Decode `{ modelID, index, expressID }` into a model
pub fn model_from_js(value: &JsValue) -> Result<Model, LoadError> {
    if !value.is_object() {
        return Err(LoadError::InvalidModel("loader resolved without a model".into()));
    }

    let model_id = field(value, "modelID")?
        .as_f64()
        .filter(|id| id.fract() == 0.0 && *id >= 0.0 && *id <= u32::MAX as f64)
        .ok_or_else(|| LoadError::InvalidModel("modelID is not a valid id".into()))?
        as u32;

    let index = u32_array(&field(value, "index")?, "index")?;
    let element_ids = u32_array(&field(value, "expressID")?, "expressID")?
        .ok_or_else(|| LoadError::InvalidModel("mesh has no expressID attribute".into()))?;

    let geometry = match index {
        Some(index) => GeometryBuffer::indexed(index, element_ids),
        None => GeometryBuffer::non_indexed(element_ids),
    };
    Ok(Model::new(model_id, geometry))
}

fn field(value: &JsValue, name: &str) -> Result<JsValue, LoadError> {
    Reflect::get(value, &JsValue::from_str(name))
        .map_err(|e| LoadError::InvalidModel(format!("{}: {}", name, js_error_message(&e))))
}

/// Copy a typed array or plain array out of JS memory; `None` when absent
fn u32_array(value: &JsValue, name: &str) -> Result<Option<Vec<u32>>, LoadError> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    if let Some(array) = value.dyn_ref::<Uint32Array>() {
        return Ok(Some(array.to_vec()));
    }
    if value.is_object() {
        return Ok(Some(Uint32Array::new(value).to_vec()));
    }
    Err(LoadError::InvalidModel(format!("{} is not an array", name)))
}
