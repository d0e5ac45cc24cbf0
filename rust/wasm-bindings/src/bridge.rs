// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript side of the viewer.
//!
//! The page supplies one object implementing this interface on top of
//! three.js (scene, camera, BVH raycasting, subset overlays) and web-ifc
//! (loading and property queries).

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(typescript_custom_section)]
const IFC_BRIDGE_TS_SECTION: &'static str = IFC_BRIDGE_TS;

const IFC_BRIDGE_TS: &'static str = r#"
export interface OverlayStyle {
  channel: "hover" | "selection";
  /** 0xRRGGBB */
  color: number;
  opacity: number;
  transparent: boolean;
  wireframe: boolean;
  depthTest: boolean;
}

export interface LoaderSettings {
  wasmPath: string;
  excludedCategories: string[];
  useFastBools: boolean;
  coordinateToOrigin: boolean;
}

export interface IfcBridge {
  /** Nearest hit under normalized device coordinates, or null */
  castRay(x: number, y: number): { modelID: number; faceIndex: number; distance?: number } | null;
  addOverlay(modelId: number, ids: Uint32Array, style: OverlayStyle, additive: boolean): void;
  removeOverlay(modelId: number, style: OverlayStyle): void;
  addModel(modelId: number): void;
  configureLoader(settings: LoaderSettings): void;
  /**
   * Resolves with the merged mesh's picking attributes. `onProgress` stays
   * callable until the next `loadModel` call.
   */
  loadModel(
    url: string,
    onProgress: (loaded: number, total: number) => void,
  ): Promise<{ modelID: number; index: Uint32Array | null; expressID: Uint32Array }>;
  getItemProperties(modelId: number, expressId: number): Promise<object | null>;
  getPropertySets(modelId: number, expressId: number): Promise<object[]>;
  getTypeProperties(modelId: number, expressId: number): Promise<object[]>;
}
"#;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(typescript_type = "IfcBridge")]
    #[derive(Clone, Debug)]
    pub type IfcBridge;

    #[wasm_bindgen(method, js_name = castRay)]
    pub fn cast_ray(this: &IfcBridge, x: f64, y: f64) -> JsValue;

    #[wasm_bindgen(method, js_name = addOverlay)]
    pub fn add_overlay(
        this: &IfcBridge,
        model_id: u32,
        ids: &[u32],
        style: &JsValue,
        additive: bool,
    );

    #[wasm_bindgen(method, js_name = removeOverlay)]
    pub fn remove_overlay(this: &IfcBridge, model_id: u32, style: &JsValue);

    #[wasm_bindgen(method, js_name = addModel)]
    pub fn add_model(this: &IfcBridge, model_id: u32);

    #[wasm_bindgen(method, catch, js_name = configureLoader)]
    pub fn configure_loader(this: &IfcBridge, settings: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = loadModel)]
    pub fn load_model(
        this: &IfcBridge,
        url: &str,
        on_progress: &Closure<dyn FnMut(f64, f64)>,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getItemProperties)]
    pub fn get_item_properties(
        this: &IfcBridge,
        model_id: u32,
        express_id: u32,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getPropertySets)]
    pub fn get_property_sets(
        this: &IfcBridge,
        model_id: u32,
        express_id: u32,
    ) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getTypeProperties)]
    pub fn get_type_properties(
        this: &IfcBridge,
        model_id: u32,
        express_id: u32,
    ) -> Result<js_sys::Promise, JsValue>;
}

/// Ray hit as reported by `castRay`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeHit {
    #[serde(rename = "modelID")]
    pub model_id: u32,
    pub face_index: u32,
    #[serde(default)]
    pub distance: f32,
}

/// Failures talking to the page
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Element #{0} not found in document")]
    MissingElement(String),

    #[error("JavaScript error: {0}")]
    Js(String),

    #[error("Unexpected value from bridge: {0}")]
    Decode(String),
}

impl BridgeError {
    /// Wrap a thrown JavaScript value
    pub fn js(value: &JsValue) -> Self {
        BridgeError::Js(js_error_message(value))
    }
}

impl From<serde_wasm_bindgen::Error> for BridgeError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        BridgeError::Decode(err.to_string())
    }
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Best-effort message of a thrown JavaScript value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
