// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC Viewer Core
//!
//! Element picking, highlighting and property inspection for IFC model
//! viewers. Rendering, raycast acceleration and IFC decoding stay with the
//! host; this crate turns pointer input into highlighted, inspectable
//! building elements.
//!
//! ## Overview
//!
//! - **Element resolution**: map a ray hit (model, triangle) to the express
//!   ID of the building element that owns it
//! - **Highlighting**: independent hover and selection channels, each
//!   highlighting at most one element with replace semantics
//! - **Properties**: fetch attributes, property sets and type properties and
//!   flatten them into one ordered bag for display
//! - **Session**: pointer, double-click, escape and load events wired to the
//!   above, with explicit policies for overlapping async work
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_viewer_core::{ScreenPoint, ViewerConfig, ViewerSession, Viewport};
//!
//! let mut session = ViewerSession::new(ViewerConfig::default(), host, panel, overlay);
//! session.set_viewport(Viewport::new(0.0, 0.0, 1280.0, 720.0));
//!
//! // Hover on every pointer move
//! session.pointer_move(ScreenPoint::new(640.0, 360.0));
//!
//! // Select and show properties on double-click
//! if let Some(element) = session.inspect(&resolver, ScreenPoint::new(640.0, 360.0)).await {
//!     println!("Selected {}", element);
//! }
//! ```

pub mod config;
pub mod error;
pub mod highlight;
pub mod loading;
pub mod model;
pub mod panel;
pub mod pointer;
pub mod properties;
pub mod resolver;
pub mod scene;
pub mod session;
pub mod web_ifc;

#[cfg(test)]
mod test_support;

pub use config::{DomIds, HighlightStyle, LoaderSettings, ViewerConfig};
pub use error::{Error, LoadError, LookupError, ResolutionError, Result};
pub use highlight::{ChannelState, HighlightStateManager, Transition};
pub use loading::{LoadProgress, LoadTicket, LoadingOverlay, ModelLoader};
pub use model::{ElementRef, ExpressId, GeometryBuffer, Model, ModelId};
pub use panel::{display_value, PropertyPanel};
pub use pointer::{NormalizedPoint, ScreenPoint, Viewport};
pub use properties::{
    Attributes, PropertyBag, PropertyResolver, PropertySet, PropertySource, TypeObject,
};
pub use resolver::{ElementResolver, RayHit};
pub use scene::{HighlightChannel, OverlayStyle, SceneHost};
pub use session::{PropertyRequest, ViewerSession, ESCAPE};
