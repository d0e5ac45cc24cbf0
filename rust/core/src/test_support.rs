// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recording fakes for unit tests.

use crate::config::HighlightStyle;
use crate::error::{LoadError, LookupError};
use crate::loading::{LoadProgress, LoadingOverlay, ModelLoader};
use crate::model::{ElementRef, ExpressId, GeometryBuffer, Model, ModelId};
use crate::panel::PropertyPanel;
use crate::pointer::NormalizedPoint;
use crate::properties::{Attributes, PropertySet, PropertySource, TypeObject};
use crate::resolver::RayHit;
use crate::scene::{HighlightChannel, OverlayStyle, SceneHost};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Add {
        model_id: ModelId,
        ids: Vec<ExpressId>,
        channel: HighlightChannel,
        additive: bool,
    },
    Remove {
        model_id: ModelId,
        channel: HighlightChannel,
    },
}

/// Horizontal band of normalized x that hits one face of a model
#[derive(Debug, Clone, Copy)]
pub struct PickZone {
    pub min_x: f64,
    pub max_x: f64,
    pub model_id: ModelId,
    pub face_index: u32,
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub models: Vec<Model>,
    pub zones: Vec<PickZone>,
    pub calls: Vec<HostCall>,
    overlays: FxHashMap<(ModelId, HighlightChannel), (Vec<ExpressId>, HighlightStyle)>,
}

impl RecordingHost {
    /// One model, x in [-0.9, 0) hits `left`, x in [0, 0.9] hits `right`
    pub fn with_two_elements(model_id: ModelId, left: ExpressId, right: ExpressId) -> Self {
        let geometry = GeometryBuffer::indexed(
            vec![0, 1, 2, 3, 4, 5],
            vec![left, left, left, right, right, right],
        );
        Self {
            models: vec![Model::new(model_id, geometry)],
            zones: vec![
                PickZone {
                    min_x: -0.9,
                    max_x: 0.0,
                    model_id,
                    face_index: 0,
                },
                PickZone {
                    min_x: 0.0,
                    max_x: 0.9 + f64::EPSILON,
                    model_id,
                    face_index: 1,
                },
            ],
            ..Self::default()
        }
    }

    pub fn apply_count(&self, channel: HighlightChannel) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Add { channel: ch, .. } if *ch == channel))
            .count()
    }

    pub fn remove_count(&self, channel: HighlightChannel) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Remove { channel: ch, .. } if *ch == channel))
            .count()
    }

    /// The single active overlay of a channel; panics if several are active
    pub fn active_overlay(&self, channel: HighlightChannel) -> Option<(ModelId, Vec<ExpressId>)> {
        let active: Vec<_> = self
            .overlays
            .iter()
            .filter(|((_, ch), _)| *ch == channel)
            .map(|((model_id, _), (ids, _))| (*model_id, ids.clone()))
            .collect();
        assert!(active.len() <= 1, "{channel} has {} overlays", active.len());
        active.into_iter().next()
    }

    pub fn overlay_material(&self, channel: HighlightChannel) -> Option<HighlightStyle> {
        self.overlays
            .iter()
            .find(|((_, ch), _)| *ch == channel)
            .map(|(_, (_, style))| style.clone())
    }
}

impl SceneHost for RecordingHost {
    fn cast_ray(&self, point: NormalizedPoint) -> Option<RayHit<'_>> {
        let zone = self
            .zones
            .iter()
            .find(|z| point.x >= z.min_x && point.x < z.max_x)?;
        let model = self.models.iter().find(|m| m.id == zone.model_id)?;
        Some(RayHit {
            model_id: model.id,
            geometry: &model.geometry,
            face_index: zone.face_index,
            distance: 1.0,
        })
    }

    fn add_overlay(
        &mut self,
        model_id: ModelId,
        element_ids: &[ExpressId],
        style: &OverlayStyle,
        additive: bool,
    ) {
        self.calls.push(HostCall::Add {
            model_id,
            ids: element_ids.to_vec(),
            channel: style.channel,
            additive,
        });
        let entry = self
            .overlays
            .entry((model_id, style.channel))
            .or_insert_with(|| (Vec::new(), style.material.clone()));
        if !additive {
            entry.0.clear();
        }
        entry.0.extend_from_slice(element_ids);
    }

    fn remove_overlay(&mut self, model_id: ModelId, style: &OverlayStyle) {
        self.calls.push(HostCall::Remove {
            model_id,
            channel: style.channel,
        });
        self.overlays.remove(&(model_id, style.channel));
    }

    fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    fn loaded_models(&self) -> &[Model] {
        &self.models
    }
}

#[derive(Debug, Default)]
pub struct RecordingPanel {
    pub rows: Vec<(String, String)>,
    pub renders: usize,
}

impl PropertyPanel for RecordingPanel {
    fn clear(&mut self) {
        self.rows.clear();
        self.renders += 1;
    }

    fn push_row(&mut self, key: &str, value: &str) {
        self.rows.push((key.to_string(), value.to_string()));
    }
}

/// Overlay fake; clones share one message log
#[derive(Debug, Clone, Default)]
pub struct RecordingOverlay {
    pub log: Rc<RefCell<Vec<String>>>,
    pub visible: Rc<RefCell<bool>>,
}

impl RecordingOverlay {
    pub fn messages(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.borrow()
    }
}

impl LoadingOverlay for RecordingOverlay {
    fn show(&self, message: &str) {
        *self.visible.borrow_mut() = true;
        self.log.borrow_mut().push(message.to_string());
    }

    fn set_message(&self, message: &str) {
        self.log.borrow_mut().push(message.to_string());
    }

    fn hide(&self) {
        *self.visible.borrow_mut() = false;
    }
}

/// In-memory property source
#[derive(Debug, Default)]
pub struct MemorySource {
    pub loaded: Vec<ModelId>,
    pub attributes: FxHashMap<ElementRef, Attributes>,
    pub property_sets: FxHashMap<ElementRef, Vec<PropertySet>>,
    pub types: FxHashMap<ElementRef, Vec<TypeObject>>,
}

impl PropertySource for MemorySource {
    fn is_loaded(&self, model_id: ModelId) -> bool {
        self.loaded.contains(&model_id)
    }

    async fn item_properties(&self, element: ElementRef) -> Result<Attributes, LookupError> {
        self.attributes
            .get(&element)
            .cloned()
            .ok_or_else(|| LookupError::element_not_found(element))
    }

    async fn property_sets(&self, element: ElementRef) -> Result<Vec<PropertySet>, LookupError> {
        Ok(self.property_sets.get(&element).cloned().unwrap_or_default())
    }

    async fn type_properties(&self, element: ElementRef) -> Result<Vec<TypeObject>, LookupError> {
        Ok(self.types.get(&element).cloned().unwrap_or_default())
    }
}

/// Loader that replays a fixed progress sequence and result
#[derive(Debug, Clone)]
pub struct ScriptedLoader {
    pub progress: Vec<LoadProgress>,
    pub result: Result<Model, LoadError>,
}

impl ModelLoader for ScriptedLoader {
    async fn load<F>(&self, url: &str, mut on_progress: F) -> Result<Model, LoadError>
    where
        F: FnMut(LoadProgress) + 'static,
    {
        for progress in &self.progress {
            on_progress(*progress);
        }
        self.result.clone().map(|model| model.with_source(url))
    }
}
