// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::bridge::BridgeError;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

/// Set panic hook for better error messages in the browser
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

pub fn window() -> Result<Window, BridgeError> {
    web_sys::window().ok_or_else(|| BridgeError::Js("no global window".into()))
}

pub fn document() -> Result<Document, BridgeError> {
    window()?
        .document()
        .ok_or_else(|| BridgeError::Js("window has no document".into()))
}

/// Look up a page element by id
pub fn element_by_id(document: &Document, id: &str) -> Result<HtmlElement, BridgeError> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| BridgeError::MissingElement(id.to_string()))
}
