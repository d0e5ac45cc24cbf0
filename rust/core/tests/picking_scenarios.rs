// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// End-to-end picking scenarios against an in-memory scene
use ifc_viewer_core::{
    Attributes, ElementRef, ExpressId, GeometryBuffer, HighlightChannel, LoadingOverlay,
    LookupError, Model, ModelId, NormalizedPoint, OverlayStyle, PropertyPanel, PropertyResolver,
    PropertySet, PropertySource, RayHit, SceneHost, ScreenPoint, TypeObject, ViewerConfig,
    ViewerSession, Viewport,
};
use rustc_hash::FxHashMap;
use serde_json::json;

/// Scene of one model whose faces are laid out left to right across the
/// canvas, one face per element, with empty margins on both sides.
#[derive(Default)]
struct StripScene {
    models: Vec<Model>,
    overlays: FxHashMap<(ModelId, HighlightChannel), (Vec<ExpressId>, bool)>,
    applies: usize,
    removes: usize,
}

impl StripScene {
    fn new(model_id: ModelId, elements: &[ExpressId]) -> Self {
        let index: Vec<u32> = (0..elements.len() as u32 * 3).collect();
        let ids = elements.iter().flat_map(|&id| [id, id, id]).collect();
        Self {
            models: vec![Model::new(model_id, GeometryBuffer::indexed(index, ids))],
            ..Self::default()
        }
    }

    fn overlay(&self, channel: HighlightChannel) -> Vec<(ModelId, Vec<ExpressId>, bool)> {
        self.overlays
            .iter()
            .filter(|((_, ch), _)| *ch == channel)
            .map(|((model, _), (ids, wireframe))| (*model, ids.clone(), *wireframe))
            .collect()
    }
}

impl SceneHost for StripScene {
    fn cast_ray(&self, point: NormalizedPoint) -> Option<RayHit<'_>> {
        let model = self.models.first()?;
        let faces = model.geometry.face_count() as f64;
        // Margins: x outside [-0.8, 0.8] misses
        if !(-0.8..0.8).contains(&point.x) {
            return None;
        }
        let face = ((point.x + 0.8) / 1.6 * faces) as u32;
        Some(RayHit {
            model_id: model.id,
            geometry: &model.geometry,
            face_index: face,
            distance: 10.0,
        })
    }

    fn add_overlay(
        &mut self,
        model_id: ModelId,
        ids: &[ExpressId],
        style: &OverlayStyle,
        additive: bool,
    ) {
        self.applies += 1;
        let entry = self
            .overlays
            .entry((model_id, style.channel))
            .or_insert_with(|| (Vec::new(), style.material.wireframe));
        if !additive {
            entry.0.clear();
        }
        entry.0.extend_from_slice(ids);
    }

    fn remove_overlay(&mut self, model_id: ModelId, style: &OverlayStyle) {
        self.removes += 1;
        self.overlays.remove(&(model_id, style.channel));
    }

    fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    fn loaded_models(&self) -> &[Model] {
        &self.models
    }
}

#[derive(Default)]
struct ListPanel {
    rows: Vec<(String, String)>,
}

impl PropertyPanel for ListPanel {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn push_row(&mut self, key: &str, value: &str) {
        self.rows.push((key.into(), value.into()));
    }
}

#[derive(Clone, Default)]
struct NoOverlay;

impl LoadingOverlay for NoOverlay {
    fn show(&self, _message: &str) {}
    fn set_message(&self, _message: &str) {}
    fn hide(&self) {}
}

struct Catalog;

impl PropertySource for Catalog {
    fn is_loaded(&self, model_id: ModelId) -> bool {
        model_id == 1
    }

    async fn item_properties(&self, element: ElementRef) -> Result<Attributes, LookupError> {
        Ok(vec![
            ("expressID".into(), json!(element.element_id)),
            ("type".into(), json!(3304561284u32)),
            ("Name".into(), json!({"type": 1, "value": format!("Element {}", element.element_id)})),
            ("Description".into(), json!(null)),
            ("psets".into(), json!([])),
            ("mats".into(), json!([])),
        ])
    }

    async fn property_sets(&self, _element: ElementRef) -> Result<Vec<PropertySet>, LookupError> {
        Ok(vec![PropertySet {
            name: Some("Pset_WindowCommon".into()),
            properties: vec![("IsExternal".into(), json!({"type": 3, "value": "T"}))],
        }])
    }

    async fn type_properties(&self, _element: ElementRef) -> Result<Vec<TypeObject>, LookupError> {
        Ok(vec![TypeObject {
            name: Some("Window Type".into()),
            property_sets: vec![PropertySet {
                name: Some("Pset_WindowCommon".into()),
                properties: vec![
                    ("IsExternal".into(), json!({"type": 3, "value": "F"})),
                    ("ThermalTransmittance".into(), json!({"type": 4, "value": 1.4})),
                ],
            }],
        }])
    }
}

type Session = ViewerSession<StripScene, ListPanel, NoOverlay>;

/// Canvas of 160 px over elements 42, 7, 13, 99 (32 px wide each, 16 px margins)
fn session() -> Session {
    let mut session = ViewerSession::new(
        ViewerConfig::default(),
        StripScene::new(1, &[42, 7, 13, 99]),
        ListPanel::default(),
        NoOverlay,
    );
    session.set_viewport(Viewport::new(0.0, 0.0, 160.0, 80.0));
    session
}

fn over(element: ExpressId) -> ScreenPoint {
    let slot = [42, 7, 13, 99].iter().position(|&e| e == element).unwrap() as f64;
    ScreenPoint::new(16.0 + slot * 32.0 + 16.0, 40.0)
}

const NOWHERE: ScreenPoint = ScreenPoint { x: 4.0, y: 40.0 };

#[test]
fn test_hover_shows_wireframe_on_single_element() {
    let mut session = session();
    session.pointer_move(over(42));

    assert_eq!(
        session.host().overlay(HighlightChannel::Hover),
        vec![(1, vec![42], true)]
    );
}

#[test]
fn test_hover_miss_empties_overlay() {
    let mut session = session();
    session.pointer_move(over(42));
    session.pointer_move(NOWHERE);

    assert!(session.host().overlay(HighlightChannel::Hover).is_empty());
    assert_eq!(session.highlights().hover_target(), None);
}

#[test]
fn test_repeated_hover_applies_once() {
    let mut session = session();
    for _ in 0..5 {
        session.pointer_move(over(13));
    }
    assert_eq!(session.host().applies, 1);
    assert_eq!(session.host().removes, 0);
}

#[test]
fn test_hover_sweep_never_stacks_overlays() {
    let mut session = session();
    for x in (0..160).step_by(3) {
        session.pointer_move(ScreenPoint::new(x as f64, 40.0));
        assert!(session.host().overlay(HighlightChannel::Hover).len() <= 1);
        assert!(session
            .host()
            .overlay(HighlightChannel::Hover)
            .iter()
            .all(|(_, ids, _)| ids.len() == 1));
    }
}

#[tokio::test]
async fn test_double_click_selects_and_shows_flattened_properties() {
    let mut session = session();
    let resolver = PropertyResolver::new(Catalog);

    let selected = session.inspect(&resolver, over(7)).await;

    assert_eq!(selected, Some(ElementRef::new(1, 7)));
    assert_eq!(
        session.host().overlay(HighlightChannel::Selection),
        vec![(1, vec![7], false)]
    );
    assert_eq!(
        session.panel().rows,
        vec![
            ("expressID".to_string(), "7".to_string()),
            ("Name".to_string(), "Element 7".to_string()),
            ("Description".to_string(), "undefined".to_string()),
            ("Pset_WindowCommon.IsExternal".to_string(), "T".to_string()),
            ("Pset_WindowCommon.ThermalTransmittance".to_string(), "1.4".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_escape_clears_selection_but_not_panel() {
    let mut session = session();
    let resolver = PropertyResolver::new(Catalog);
    session.inspect(&resolver, over(7)).await;
    let shown = session.panel().rows.clone();

    session.key_down("Escape");

    assert!(session.host().overlay(HighlightChannel::Selection).is_empty());
    assert_eq!(session.highlights().selected_target(), None);
    assert_eq!(session.panel().rows, shown);
}

#[tokio::test]
async fn test_double_click_miss_clears_selection() {
    let mut session = session();
    let resolver = PropertyResolver::new(Catalog);
    session.inspect(&resolver, over(99)).await;

    assert_eq!(session.inspect(&resolver, NOWHERE).await, None);
    assert!(session.host().overlay(HighlightChannel::Selection).is_empty());
}

#[tokio::test]
async fn test_hover_and_selection_coexist() {
    let mut session = session();
    let resolver = PropertyResolver::new(Catalog);

    session.inspect(&resolver, over(7)).await;
    session.pointer_move(over(13));

    assert_eq!(
        session.host().overlay(HighlightChannel::Selection),
        vec![(1, vec![7], false)]
    );
    assert_eq!(
        session.host().overlay(HighlightChannel::Hover),
        vec![(1, vec![13], true)]
    );
}
