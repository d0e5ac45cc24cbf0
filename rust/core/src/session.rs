// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer session: input events in, highlights and panel updates out.
//!
//! One session owns all mutable viewer state. Suspending work (property
//! fetches, model loads) is split into a synchronous start and a
//! completion step, so callers that share the session behind a `RefCell`
//! never hold a borrow across an await point.
//!
//! Policies for overlapping work:
//! - property fetches are last-write-wins: every selection change or
//!   escape invalidates the fetches started before it;
//! - loads are rejected while another load is pending.

use crate::config::ViewerConfig;
use crate::error::{LoadError, LookupError};
use crate::highlight::{HighlightStateManager, Transition};
use crate::loading::{LoadProgress, LoadTicket, LoadingOverlay, ModelLoader, LOADING_MESSAGE};
use crate::model::{ElementRef, Model, ModelId};
use crate::panel::PropertyPanel;
use crate::pointer::{ScreenPoint, Viewport};
use crate::properties::{PropertyBag, PropertyResolver, PropertySource};
use crate::scene::SceneHost;

/// Key code that cancels the selection
pub const ESCAPE: &str = "Escape";

/// A property fetch started by a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a property request must be completed to update the panel"]
pub struct PropertyRequest {
    element: ElementRef,
    generation: u64,
}

impl PropertyRequest {
    pub fn element(&self) -> ElementRef {
        self.element
    }
}

/// State of one viewer session.
pub struct ViewerSession<H, P, O> {
    config: ViewerConfig,
    host: H,
    panel: P,
    overlay: O,
    highlights: HighlightStateManager,
    viewport: Viewport,
    generation: u64,
    pending_load: Option<String>,
}

impl<H, P, O> ViewerSession<H, P, O>
where
    H: SceneHost,
    P: PropertyPanel,
    O: LoadingOverlay,
{
    pub fn new(config: ViewerConfig, host: H, panel: P, overlay: O) -> Self {
        let highlights = HighlightStateManager::from_config(&config);
        Self {
            config,
            host,
            panel,
            overlay,
            highlights,
            viewport: Viewport::default(),
            generation: 0,
            pending_load: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn highlights(&self) -> &HighlightStateManager {
        &self.highlights
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Update the hover highlight for a pointer move
    pub fn pointer_move(&mut self, point: ScreenPoint) -> Transition {
        match self.viewport.normalize(point) {
            Some(ndc) => self.highlights.update_hover(&mut self.host, ndc),
            None => self.highlights.clear_hover(&mut self.host),
        }
    }

    /// Select the element under a double-click.
    ///
    /// Returns the property request to run for the selected element, or
    /// `None` on a miss (which clears the selection).
    pub fn double_click(&mut self, point: ScreenPoint) -> Option<PropertyRequest> {
        self.generation += 1;
        let selected = match self.viewport.normalize(point) {
            Some(ndc) => self.highlights.commit_selection(&mut self.host, ndc),
            None => {
                self.highlights.clear_selection(&mut self.host);
                None
            }
        };
        selected.map(|element| PropertyRequest {
            element,
            generation: self.generation,
        })
    }

    /// Handle a key press; returns true if the key was consumed
    pub fn key_down(&mut self, code: &str) -> bool {
        if code == ESCAPE {
            self.clear_selection();
            true
        } else {
            false
        }
    }

    /// Drop the selection and invalidate pending property fetches.
    ///
    /// The panel keeps showing the last rendered properties.
    pub fn clear_selection(&mut self) -> Transition {
        self.generation += 1;
        self.highlights.clear_selection(&mut self.host)
    }

    /// Whether no newer selection has superseded `request`
    pub fn is_current(&self, request: &PropertyRequest) -> bool {
        request.generation == self.generation
    }

    /// Finish a property fetch; returns true if the panel was updated
    pub fn complete_property_request(
        &mut self,
        request: PropertyRequest,
        result: Result<PropertyBag, LookupError>,
    ) -> bool {
        if !self.is_current(&request) {
            tracing::debug!(element = %request.element, "Discarding superseded property fetch");
            return false;
        }
        match result {
            Ok(bag) => {
                self.panel.render(bag);
                true
            }
            Err(e) => {
                tracing::warn!(element = %request.element, error = %e, "Property lookup failed");
                false
            }
        }
    }

    /// Select under `point` and show the element's properties
    pub async fn inspect<S: PropertySource>(
        &mut self,
        resolver: &PropertyResolver<S>,
        point: ScreenPoint,
    ) -> Option<ElementRef> {
        let request = self.double_click(point)?;
        let result = resolver.resolve(request.element).await;
        self.complete_property_request(request, result);
        Some(request.element)
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Admit a load and show the loading overlay.
    ///
    /// Rejected with [`LoadError::AlreadyLoading`] while another load runs.
    pub fn begin_load(&mut self, url: &str) -> Result<LoadTicket, LoadError> {
        if let Some(pending) = &self.pending_load {
            tracing::warn!(url, pending = %pending, "Rejecting load while another is pending");
            return Err(LoadError::AlreadyLoading {
                pending: pending.clone(),
            });
        }
        self.pending_load = Some(url.to_string());
        self.overlay.show(LOADING_MESSAGE);
        Ok(LoadTicket::new(url))
    }

    pub fn report_progress(&self, progress: LoadProgress) {
        self.overlay.set_message(&progress.message());
    }

    /// Finish an admitted load: hide the overlay and register the model
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Model, LoadError>,
    ) -> Result<ModelId, LoadError> {
        self.pending_load = None;
        self.overlay.hide();

        let model = match result {
            Ok(model) => model,
            Err(e) => {
                tracing::error!(url = ticket.url(), error = %e, "Model load failed");
                return Err(e);
            }
        };

        if self.host.is_loaded(model.id) {
            let e = LoadError::InvalidModel(format!("model {} is already loaded", model.id));
            tracing::error!(url = ticket.url(), error = %e, "Model load failed");
            return Err(e);
        }

        let model_id = model.id;
        tracing::info!(
            url = ticket.url(),
            model_id,
            elements = model.element_count(),
            faces = model.geometry.face_count(),
            "Model loaded"
        );
        self.host.add_model(model);
        Ok(model_id)
    }

    /// Load a model end to end, updating the overlay with progress
    pub async fn load_model<L: ModelLoader>(
        &mut self,
        loader: &L,
        url: &str,
    ) -> Result<ModelId, LoadError>
    where
        O: Clone + 'static,
    {
        let ticket = self.begin_load(url)?;
        let overlay = self.overlay.clone();
        let result = loader
            .load(url, move |progress| overlay.set_message(&progress.message()))
            .await;
        self.finish_load(ticket, result)
    }
}
