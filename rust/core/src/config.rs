// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer configuration.
//!
//! Every field has a default, so an empty JSON object (or a partial one
//! coming from JavaScript) is a valid configuration.

use crate::error::Result;
use crate::scene::{HighlightChannel, OverlayStyle};
use serde::{Deserialize, Serialize};

/// Overlay material of a highlight channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightStyle {
    /// RGB color as 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    /// Draw on top of the model when false
    pub depth_test: bool,
}

impl HighlightStyle {
    /// Translucent wireframe used while hovering
    pub fn hover() -> Self {
        Self {
            wireframe: true,
            ..Self::default()
        }
    }

    /// Translucent solid fill used for the selection
    pub fn selection() -> Self {
        Self::default()
    }

    /// Color as a CSS hex string
    pub fn css_color(&self) -> String {
        format!("#{:06x}", self.color & 0x00ff_ffff)
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: 0x0080ff,
            opacity: 0.6,
            transparent: true,
            wireframe: false,
            depth_test: false,
        }
    }
}

/// Ids of the page elements the viewer binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomIds {
    pub canvas: String,
    pub loading_overlay: String,
    pub loading_progress: String,
    pub property_panel: String,
    /// Class toggled to hide the loading overlay
    pub hidden_class: String,
}

impl Default for DomIds {
    fn default() -> Self {
        Self {
            canvas: "three-canvas".into(),
            loading_overlay: "loading-overlay".into(),
            loading_progress: "loading-progress".into(),
            property_panel: "ifc-property-menu-root".into(),
            hidden_class: "hidden".into(),
        }
    }
}

/// Settings forwarded to the IFC loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderSettings {
    /// Directory serving the web-ifc wasm binary
    pub wasm_path: String,
    /// IFC entity classes left out of the generated geometry
    pub excluded_categories: Vec<String>,
    pub use_fast_bools: bool,
    /// Move the model to the scene origin
    pub coordinate_to_origin: bool,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            wasm_path: "../../wasm/".into(),
            excluded_categories: vec!["IFCSPACE".into(), "IFCOPENINGELEMENT".into()],
            use_fast_bools: true,
            coordinate_to_origin: true,
        }
    }
}

/// Viewer session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub hover_style: HighlightStyle,
    pub selection_style: HighlightStyle,
    pub dom: DomIds,
    pub loader: LoaderSettings,
    /// Minimum level forwarded to the browser console
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            hover_style: HighlightStyle::hover(),
            selection_style: HighlightStyle::selection(),
            dom: DomIds::default(),
            loader: LoaderSettings::default(),
            log_level: "info".into(),
        }
    }
}

impl ViewerConfig {
    /// Parse a configuration from JSON, defaulting missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn overlay_style(&self, channel: HighlightChannel) -> OverlayStyle {
        let material = match channel {
            HighlightChannel::Hover => self.hover_style.clone(),
            HighlightChannel::Selection => self.selection_style.clone(),
        };
        OverlayStyle::new(channel, material)
    }
}
