// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene host backed by the page's three.js scene.

use crate::bridge::{BridgeHit, IfcBridge};
use ifc_viewer_core::{
    ExpressId, Model, ModelId, NormalizedPoint, OverlayStyle, RayHit, SceneHost,
};
use serde::Serialize;
use wasm_bindgen::JsValue;

/// Raycasts and overlays go through the bridge; the picking attributes of
/// every loaded model are kept on the Rust side.
pub struct JsSceneHost {
    bridge: IfcBridge,
    models: Vec<Model>,
}

impl JsSceneHost {
    pub fn new(bridge: IfcBridge) -> Self {
        Self {
            bridge,
            models: Vec::new(),
        }
    }

    /// Plain object, not a `Map`: the flattened material serializes as a map
    fn style_value(style: &OverlayStyle) -> JsValue {
        match style.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Could not encode overlay style");
                JsValue::NULL
            }
        }
    }
}

impl SceneHost for JsSceneHost {
    fn cast_ray(&self, point: NormalizedPoint) -> Option<RayHit<'_>> {
        let raw = self.bridge.cast_ray(point.x, point.y);
        if raw.is_null() || raw.is_undefined() {
            return None;
        }
        let hit: BridgeHit = match serde_wasm_bindgen::from_value(raw) {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed ray hit");
                return None;
            }
        };
        let Some(model) = self.models.iter().find(|m| m.id == hit.model_id) else {
            tracing::debug!(model_id = hit.model_id, "Ray hit a mesh that is not a loaded model");
            return None;
        };
        Some(RayHit {
            model_id: model.id,
            geometry: &model.geometry,
            face_index: hit.face_index,
            distance: hit.distance,
        })
    }

    fn add_overlay(
        &mut self,
        model_id: ModelId,
        element_ids: &[ExpressId],
        style: &OverlayStyle,
        additive: bool,
    ) {
        self.bridge
            .add_overlay(model_id, element_ids, &Self::style_value(style), additive);
    }

    fn remove_overlay(&mut self, model_id: ModelId, style: &OverlayStyle) {
        self.bridge.remove_overlay(model_id, &Self::style_value(style));
    }

    fn add_model(&mut self, model: Model) {
        self.bridge.add_model(model.id);
        self.models.push(model);
    }

    fn loaded_models(&self) -> &[Model] {
        &self.models
    }
}
