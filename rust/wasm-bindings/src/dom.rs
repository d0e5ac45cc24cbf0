// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DOM renditions of the property panel and the loading overlay.

use crate::bridge::{js_error_message, BridgeError};
use crate::utils::element_by_id;
use ifc_viewer_core::{DomIds, LoadingOverlay, PropertyPanel};
use web_sys::{Document, HtmlElement};

pub const ITEM_CLASS: &str = "ifc-property-item";
pub const VALUE_CLASS: &str = "ifc-property-value";

/// Key/value rows under `#ifc-property-menu-root`:
///
/// ```html
/// <div class="ifc-property-item">
///   <div>Name</div>
///   <div class="ifc-property-value">Basic Wall</div>
/// </div>
/// ```
pub struct DomPropertyPanel {
    document: Document,
    root: HtmlElement,
}

impl DomPropertyPanel {
    pub fn new(document: &Document, ids: &DomIds) -> Result<Self, BridgeError> {
        Ok(Self {
            document: document.clone(),
            root: element_by_id(document, &ids.property_panel)?,
        })
    }

    fn row(&self, key: &str, value: &str) -> Result<(), BridgeError> {
        let item = self.document.create_element("div").map_err(|e| BridgeError::js(&e))?;
        item.set_class_name(ITEM_CLASS);

        let key_cell = self.document.create_element("div").map_err(|e| BridgeError::js(&e))?;
        key_cell.set_text_content(Some(key));

        let value_cell = self.document.create_element("div").map_err(|e| BridgeError::js(&e))?;
        value_cell.set_class_name(VALUE_CLASS);
        value_cell.set_text_content(Some(value));

        item.append_child(&key_cell).map_err(|e| BridgeError::js(&e))?;
        item.append_child(&value_cell).map_err(|e| BridgeError::js(&e))?;
        self.root.append_child(&item).map_err(|e| BridgeError::js(&e))?;
        Ok(())
    }
}

impl PropertyPanel for DomPropertyPanel {
    fn clear(&mut self) {
        while let Some(child) = self.root.first_child() {
            if let Err(e) = self.root.remove_child(&child) {
                tracing::warn!(error = %js_error_message(&e), "Could not clear property panel");
                return;
            }
        }
    }

    fn push_row(&mut self, key: &str, value: &str) {
        if let Err(e) = self.row(key, value) {
            tracing::warn!(key, error = %e, "Could not add property row");
        }
    }
}

/// `#loading-overlay` with its `#loading-progress` text
#[derive(Clone)]
pub struct DomLoadingOverlay {
    overlay: HtmlElement,
    progress: HtmlElement,
    hidden_class: String,
}

impl DomLoadingOverlay {
    pub fn new(document: &Document, ids: &DomIds) -> Result<Self, BridgeError> {
        Ok(Self {
            overlay: element_by_id(document, &ids.loading_overlay)?,
            progress: element_by_id(document, &ids.loading_progress)?,
            hidden_class: ids.hidden_class.clone(),
        })
    }
}

impl LoadingOverlay for DomLoadingOverlay {
    fn show(&self, message: &str) {
        self.set_message(message);
        if let Err(e) = self.overlay.class_list().remove_1(&self.hidden_class) {
            tracing::warn!(error = %js_error_message(&e), "Could not show loading overlay");
        }
    }

    fn set_message(&self, message: &str) {
        self.progress.set_inner_text(message);
    }

    fn hide(&self) {
        if let Err(e) = self.overlay.class_list().add_1(&self.hidden_class) {
            tracing::warn!(error = %js_error_message(&e), "Could not hide loading overlay");
        }
    }
}
