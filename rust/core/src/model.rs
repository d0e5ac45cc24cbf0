// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loaded models and the element references resolved from them.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session-unique model identifier (web-ifc `modelID`)
pub type ModelId = u32;

/// Per-model element identifier
pub type ExpressId = u32;

/// A building element within one model.
///
/// `element_id` is only unique inside the id space of `model_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRef {
    pub model_id: ModelId,
    pub element_id: ExpressId,
}

impl ElementRef {
    pub fn new(model_id: ModelId, element_id: ExpressId) -> Self {
        Self {
            model_id,
            element_id,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.model_id, self.element_id)
    }
}

/// Picking data of a model's merged mesh.
///
/// Holds the triangle index buffer (absent for non-indexed geometry) and the
/// per-vertex express ID attribute. Rendering attributes stay on the scene
/// side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryBuffer {
    index: Option<Vec<u32>>,
    element_ids: Option<Vec<ExpressId>>,
}

impl GeometryBuffer {
    /// Indexed geometry: three indices per face
    pub fn indexed(index: Vec<u32>, element_ids: Vec<ExpressId>) -> Self {
        Self {
            index: Some(index),
            element_ids: Some(element_ids),
        }
    }

    /// Non-indexed geometry: three consecutive vertices per face
    pub fn non_indexed(element_ids: Vec<ExpressId>) -> Self {
        Self {
            index: None,
            element_ids: Some(element_ids),
        }
    }

    #[inline]
    pub fn index(&self) -> Option<&[u32]> {
        self.index.as_deref()
    }

    #[inline]
    pub fn element_ids(&self) -> Option<&[ExpressId]> {
        self.element_ids.as_deref()
    }

    /// Number of triangles addressable by a face index
    pub fn face_count(&self) -> usize {
        match (&self.index, &self.element_ids) {
            (Some(index), _) => index.len() / 3,
            (None, Some(ids)) => ids.len() / 3,
            (None, None) => 0,
        }
    }

    /// Drop the express ID attribute, leaving the buffer stale.
    pub fn release_element_ids(&mut self) {
        self.element_ids = None;
    }

    #[inline]
    pub fn is_stale(&self) -> bool {
        self.element_ids.is_none()
    }

    /// Distinct express IDs present in the geometry
    pub fn distinct_elements(&self) -> FxHashSet<ExpressId> {
        self.element_ids
            .iter()
            .flat_map(|ids| ids.iter().copied())
            .collect()
    }
}

/// A model registered with the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub id: ModelId,
    pub geometry: GeometryBuffer,
    /// URL the model was loaded from, if any
    pub source: Option<String>,
}

impl Model {
    pub fn new(id: ModelId, geometry: GeometryBuffer) -> Self {
        Self {
            id,
            geometry,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn element_count(&self) -> usize {
        self.geometry.distinct_elements().len()
    }
}
