// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for picking, property lookup and model loading.

use crate::model::{ElementRef, ExpressId, ModelId};
use thiserror::Error;

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// A ray hit that cannot be mapped back to a building element.
///
/// Always handled as a miss by the highlight channels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Model {model_id} has no element ID mapping")]
    NoElementIds { model_id: ModelId },

    #[error("Face {face_index} is out of bounds for model {model_id} ({face_count} faces)")]
    FaceOutOfBounds {
        model_id: ModelId,
        face_index: u32,
        face_count: usize,
    },

    #[error("Vertex {vertex} has no element ID in model {model_id}")]
    VertexOutOfBounds { model_id: ModelId, vertex: u32 },
}

/// Property lookup failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Model {0} is not loaded")]
    ModelNotLoaded(ModelId),

    #[error("Element #{element_id} not found in model {model_id}")]
    ElementNotFound {
        model_id: ModelId,
        element_id: ExpressId,
    },

    #[error("Malformed property response: {0}")]
    MalformedResponse(String),

    #[error("Property source error: {0}")]
    Source(String),
}

impl LookupError {
    pub fn element_not_found(element: ElementRef) -> Self {
        LookupError::ElementNotFound {
            model_id: element.model_id,
            element_id: element.element_id,
        }
    }
}

/// Model loading failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("A model is already loading: {pending}")]
    AlreadyLoading { pending: String },

    #[error("Failed to load {url}: {reason}")]
    Failed { url: String, reason: String },

    #[error("Invalid model data: {0}")]
    InvalidModel(String),
}

/// Errors that can occur in the viewer core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
