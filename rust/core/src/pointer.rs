// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pointer positions and the canvas viewport.

use serde::{Deserialize, Serialize};

/// Pointer position in client (CSS pixel) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pointer position in normalized device coordinates.
///
/// Both axes span -1..1, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

/// Client-space bounds of the render canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Viewport from a bounding rect's edges
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Map a client position to normalized device coordinates.
    ///
    /// Returns `None` for a zero-sized viewport.
    pub fn normalize(&self, point: ScreenPoint) -> Option<NormalizedPoint> {
        if self.is_degenerate() {
            return None;
        }
        Some(NormalizedPoint {
            x: ((point.x - self.left) / self.width) * 2.0 - 1.0,
            y: -((point.y - self.top) / self.height) * 2.0 + 1.0,
        })
    }
}
