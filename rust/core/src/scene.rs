// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The scene host seam.
//!
//! Rendering, raycast acceleration and overlay materials belong to the host;
//! the picking core only casts rays and asks for overlays.

use crate::config::HighlightStyle;
use crate::model::{ExpressId, Model, ModelId};
use crate::pointer::NormalizedPoint;
use crate::resolver::RayHit;
use serde::Serialize;
use std::fmt;

/// Highlight channel an overlay belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightChannel {
    /// Transient pointer-over highlight
    Hover,
    /// Double-click selection
    Selection,
}

impl HighlightChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightChannel::Hover => "hover",
            HighlightChannel::Selection => "selection",
        }
    }
}

impl fmt::Display for HighlightChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overlay request style: the owning channel and its material.
///
/// Hosts key overlays by `channel`, never by material identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    pub channel: HighlightChannel,
    #[serde(flatten)]
    pub material: HighlightStyle,
}

impl OverlayStyle {
    pub fn new(channel: HighlightChannel, material: HighlightStyle) -> Self {
        Self { channel, material }
    }
}

/// Render-side collaborator owning the camera, the models and the overlays.
pub trait SceneHost {
    /// Cast a ray from the camera through `point`, returning the nearest hit
    fn cast_ray(&self, point: NormalizedPoint) -> Option<RayHit<'_>>;

    /// Highlight `element_ids` of a model with `style`.
    ///
    /// With `additive == false` the channel's previous overlay on that model
    /// is replaced.
    fn add_overlay(
        &mut self,
        model_id: ModelId,
        element_ids: &[ExpressId],
        style: &OverlayStyle,
        additive: bool,
    );

    /// Remove the overlay of `style.channel` from a model
    fn remove_overlay(&mut self, model_id: ModelId, style: &OverlayStyle);

    /// Take ownership of a freshly loaded model and make it pickable
    fn add_model(&mut self, model: Model);

    fn loaded_models(&self) -> &[Model];

    fn is_loaded(&self, model_id: ModelId) -> bool {
        self.loaded_models().iter().any(|m| m.id == model_id)
    }
}
