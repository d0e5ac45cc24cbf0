// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Viewer WebAssembly Bindings
//!
//! Browser side of the picking core, built with wasm-bindgen. The page
//! provides an `IfcBridge` over three.js and web-ifc; `IfcViewer` drives
//! hover, selection, the property panel and model loading on top of it.

use wasm_bindgen::prelude::*;

mod bridge;
mod dom;
mod loader;
mod logging;
mod property_source;
mod scene_host;
mod utils;
mod viewer;

pub use bridge::{BridgeError, BridgeHit, IfcBridge};
pub use dom::{DomLoadingOverlay, DomPropertyPanel};
pub use loader::{model_from_js, JsModelLoader};
pub use logging::{init_logging, ConsoleLayer};
pub use property_source::JsPropertySource;
pub use scene_host::JsSceneHost;
pub use utils::set_panic_hook as init_panic_hook;
pub use viewer::IfcViewer;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
}

/// Get the version of the viewer bindings
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
