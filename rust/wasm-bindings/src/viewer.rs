// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `IfcViewer`: the picking session exposed to JavaScript.

use crate::bridge::{js_error_message, BridgeError, IfcBridge};
use crate::dom::{DomLoadingOverlay, DomPropertyPanel};
use crate::loader::JsModelLoader;
use crate::logging::init_logging;
use crate::property_source::JsPropertySource;
use crate::scene_host::JsSceneHost;
use crate::utils::{document, element_by_id, window};
use ifc_viewer_core::{
    ElementRef, LoadError, LoadingOverlay, ModelId, ModelLoader, PropertyResolver, SceneHost,
    ScreenPoint, ViewerConfig, ViewerSession, Viewport,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Event, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};

type Session = ViewerSession<JsSceneHost, DomPropertyPanel, DomLoadingOverlay>;

/// State shared between the exported handle and its event listeners
struct Inner {
    session: RefCell<Session>,
    resolver: PropertyResolver<JsPropertySource>,
    loader: JsModelLoader,
    canvas: HtmlElement,
}

impl Inner {
    fn sync_viewport(&self) {
        let rect = self.canvas.get_bounding_client_rect();
        self.session.borrow_mut().set_viewport(Viewport::from_edges(
            rect.left(),
            rect.top(),
            rect.right(),
            rect.bottom(),
        ));
    }

    fn pointer_move(&self, point: ScreenPoint) {
        self.sync_viewport();
        self.session.borrow_mut().pointer_move(point);
    }

    /// Select synchronously, then fetch properties without holding the session
    fn double_click(self: &Rc<Self>, point: ScreenPoint) {
        self.sync_viewport();
        let Some(request) = self.session.borrow_mut().double_click(point) else {
            return;
        };
        let inner = Rc::clone(self);
        spawn_local(async move {
            let result = inner.resolver.resolve(request.element()).await;
            inner
                .session
                .borrow_mut()
                .complete_property_request(request, result);
        });
    }

    fn key_down(&self, code: &str) {
        self.session.borrow_mut().key_down(code);
    }

    async fn load(self: Rc<Self>, url: String) -> Result<ModelId, LoadError> {
        let (ticket, overlay) = {
            let mut session = self.session.borrow_mut();
            let ticket = session.begin_load(&url)?;
            (ticket, session.overlay().clone())
        };

        let result = self
            .loader
            .load(&url, move |progress| overlay.set_message(&progress.message()))
            .await;

        let model_id = self.session.borrow_mut().finish_load(ticket, result)?;
        self.resolver.source().mark_loaded(model_id);
        Ok(model_id)
    }

    fn spawn_load(self: &Rc<Self>, url: String) {
        let inner = Rc::clone(self);
        spawn_local(async move {
            // finish_load already logged the failure
            let _ = inner.load(url).await;
        });
    }
}

/// A registered DOM listener, removed again on detach
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, BridgeError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| BridgeError::js(&e))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    fn remove(self) {
        let callback = self.callback.as_ref().unchecked_ref();
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, callback)
        {
            tracing::warn!(
                event = self.event,
                error = %js_error_message(&e),
                "Could not remove listener"
            );
        }
    }
}

fn client_point(event: &Event) -> Option<ScreenPoint> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(ScreenPoint::new(mouse.client_x() as f64, mouse.client_y() as f64))
}

/// Element picking and property inspection over a three.js scene.
///
/// ```javascript
/// const viewer = new IfcViewer(bridge, { logLevel: "debug" });
/// viewer.attach();
/// const modelId = await viewer.loadUrl("models/office.ifc");
/// ```
#[wasm_bindgen]
pub struct IfcViewer {
    inner: Rc<Inner>,
    listeners: Vec<Listener>,
    file_input: Option<HtmlInputElement>,
}

#[wasm_bindgen]
impl IfcViewer {
    /// Bind to the page elements named in `config` (all fields optional)
    #[wasm_bindgen(constructor)]
    pub fn new(bridge: IfcBridge, config: JsValue) -> Result<IfcViewer, JsValue> {
        let config: ViewerConfig = if config.is_null() || config.is_undefined() {
            ViewerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(BridgeError::from)?
        };
        init_logging(&config.log_level);

        let settings = config
            .loader
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(BridgeError::from)?;
        bridge.configure_loader(&settings)?;

        let document = document()?;
        let canvas = element_by_id(&document, &config.dom.canvas)?;
        let panel = DomPropertyPanel::new(&document, &config.dom)?;
        let overlay = DomLoadingOverlay::new(&document, &config.dom)?;
        overlay.hide();

        let inner = Inner {
            resolver: PropertyResolver::new(JsPropertySource::new(bridge.clone())),
            loader: JsModelLoader::new(bridge.clone()),
            session: RefCell::new(ViewerSession::new(
                config,
                JsSceneHost::new(bridge),
                panel,
                overlay,
            )),
            canvas,
        };
        inner.sync_viewport();
        tracing::debug!("Viewer created");

        Ok(IfcViewer {
            inner: Rc::new(inner),
            listeners: Vec::new(),
            file_input: None,
        })
    }

    /// Listen to window input events and create the hidden file picker
    pub fn attach(&mut self) -> Result<(), JsValue> {
        if !self.listeners.is_empty() {
            return Ok(());
        }
        let window: EventTarget = window()?.into();

        let inner = Rc::clone(&self.inner);
        self.listeners.push(Listener::add(&window, "mousemove", move |event| {
            if let Some(point) = client_point(&event) {
                inner.pointer_move(point);
            }
        })?);

        let inner = Rc::clone(&self.inner);
        self.listeners.push(Listener::add(&window, "dblclick", move |event| {
            if let Some(point) = client_point(&event) {
                inner.double_click(point);
            }
        })?);

        let inner = Rc::clone(&self.inner);
        self.listeners.push(Listener::add(&window, "keydown", move |event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                inner.key_down(&key.code());
            }
        })?);

        let inner = Rc::clone(&self.inner);
        self.listeners.push(Listener::add(&window, "resize", move |_| {
            inner.sync_viewport();
        })?);

        let (input, listener) = self.create_file_input()?;
        self.listeners.push(listener);
        self.file_input = Some(input);
        Ok(())
    }

    /// Remove every listener and the file picker added by `attach`
    pub fn detach(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.remove();
        }
        if let Some(input) = self.file_input.take() {
            input.remove();
        }
    }

    /// Open the file picker; the chosen file is loaded as a new model
    #[wasm_bindgen(js_name = openFilePicker)]
    pub fn open_file_picker(&self) {
        match &self.file_input {
            Some(input) => input.click(),
            None => tracing::warn!("File picker requested before attach"),
        }
    }

    /// Hover at client coordinates
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) {
        self.inner.pointer_move(ScreenPoint::new(x, y));
    }

    /// Select at client coordinates and show the element's properties
    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&self, x: f64, y: f64) {
        self.inner.double_click(ScreenPoint::new(x, y));
    }

    /// Clear the selection
    pub fn escape(&self) {
        self.inner.session.borrow_mut().clear_selection();
    }

    /// Load a model; resolves with its model id
    #[wasm_bindgen(js_name = loadUrl)]
    pub fn load_url(&self, url: String) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            match inner.load(url).await {
                Ok(model_id) => Ok(JsValue::from(model_id)),
                Err(e) => Err(js_sys::Error::new(&e.to_string()).into()),
            }
        })
    }

    #[wasm_bindgen(js_name = loadedModels)]
    pub fn loaded_models(&self) -> Vec<u32> {
        let session = self.inner.session.borrow();
        session.host().loaded_models().iter().map(|m| m.id).collect()
    }

    /// `{ modelId, elementId }` under the pointer, or undefined
    #[wasm_bindgen(js_name = hoveredElement)]
    pub fn hovered_element(&self) -> Result<JsValue, JsValue> {
        let target = self.inner.session.borrow().highlights().hover_target();
        element_value(target)
    }

    /// `{ modelId, elementId }` of the selection, or undefined
    #[wasm_bindgen(js_name = selectedElement)]
    pub fn selected_element(&self) -> Result<JsValue, JsValue> {
        let target = self.inner.session.borrow().highlights().selected_target();
        element_value(target)
    }
}

impl IfcViewer {
    /// Hidden `<input type="file">` loading the chosen file as a new model
    fn create_file_input(&self) -> Result<(HtmlInputElement, Listener), BridgeError> {
        let document = document()?;
        let input: HtmlInputElement = document
            .create_element("input")
            .map_err(|e| BridgeError::js(&e))?
            .unchecked_into();
        input.set_type("file");
        let hidden_class = self.inner.session.borrow().config().dom.hidden_class.clone();
        input
            .class_list()
            .add_1(&hidden_class)
            .map_err(|e| BridgeError::js(&e))?;

        let inner = Rc::clone(&self.inner);
        let picker = input.clone();
        let listener = Listener::add(&input, "change", move |_| {
            let Some(file) = picker.files().and_then(|files| files.get(0)) else {
                return;
            };
            match web_sys::Url::create_object_url_with_blob(&file) {
                Ok(url) => inner.spawn_load(url),
                Err(e) => tracing::error!(
                    file = %file.name(),
                    error = %js_error_message(&e),
                    "Could not open file"
                ),
            }
        })?;

        let body = document
            .body()
            .ok_or_else(|| BridgeError::MissingElement("body".into()))?;
        body.append_child(&input).map_err(|e| BridgeError::js(&e))?;
        Ok((input, listener))
    }
}

impl Drop for IfcViewer {
    fn drop(&mut self) {
        self.detach();
    }
}

fn element_value(target: Option<ElementRef>) -> Result<JsValue, JsValue> {
    match target {
        Some(element) => Ok(serde_wasm_bindgen::to_value(&element).map_err(BridgeError::from)?),
        None => Ok(JsValue::UNDEFINED),
    }
}
