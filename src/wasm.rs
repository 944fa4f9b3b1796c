//! Browser binding.
//!
//! The page owns a Leaflet map and the form widgets; this module owns the
//! state. JavaScript posts JSON commands into a [`WebConsole`], which queues
//! them and drains the queue from a single task so that every command,
//! including its network round-trip, completes before the next one starts.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::config::AppConfig;
use crate::console::{Command, Console};
use crate::drawing::{DrawingKind, DrawingStats, Sketch};
use crate::geocode::NominatimGeocoder;
use crate::layers::{ImportedLayer, LayerId};
use crate::map::{Bounds, MapSurface};
use crate::model::{Order, Position};
use crate::store::{
    BrowserStorage, FetchTransport, LocalBackend, OrderBackend, OrderChange, PersistenceError,
    PersistenceMode, RemoteBackend,
};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load_from_local_storage().unwrap_or_default();
    if let Err(e) = console_log::init_with_level(config.log_level.to_level()) {
        web_sys::console::log_1(&format!("Logger init failed: {}", e).into());
    }
    log::info!("SkySurvey WASM starting...");
}

// ============================================================================
// Backend selected at runtime
// ============================================================================

enum WebBackend {
    Local(LocalBackend<BrowserStorage>),
    Remote(RemoteBackend<FetchTransport>),
}

impl WebBackend {
    fn from_config(config: &AppConfig) -> Self {
        match config.persistence.mode {
            PersistenceMode::Local => Self::Local(LocalBackend::new(BrowserStorage)),
            PersistenceMode::Remote => Self::Remote(RemoteBackend::new(
                FetchTransport,
                config.persistence.api_base_url.clone(),
            )),
        }
    }
}

impl OrderBackend for WebBackend {
    fn mode(&self) -> PersistenceMode {
        match self {
            Self::Local(backend) => backend.mode(),
            Self::Remote(backend) => backend.mode(),
        }
    }

    async fn load(&mut self) -> Result<Vec<Order>, PersistenceError> {
        match self {
            Self::Local(backend) => backend.load().await,
            Self::Remote(backend) => backend.load().await,
        }
    }

    async fn apply(&mut self, change: &OrderChange, snapshot: &[Order]) -> Result<(), PersistenceError> {
        match self {
            Self::Local(backend) => backend.apply(change, snapshot).await,
            Self::Remote(backend) => backend.apply(change, snapshot).await,
        }
    }
}

// ============================================================================
// Map surface backed by a JS object
// ============================================================================

/// Forwards surface calls to methods of a JS object. Arguments are JSON text.
struct JsMapSurface {
    target: JsValue,
}

impl JsMapSurface {
    fn call(&self, method: &str, args: &[JsValue]) {
        let func = match js_sys::Reflect::get(&self.target, &JsValue::from_str(method)) {
            Ok(func) => func,
            Err(e) => {
                log::error!("Map surface lookup of '{}' failed: {:?}", method, e);
                return;
            }
        };
        let Some(func) = func.dyn_ref::<js_sys::Function>() else {
            log::warn!("Map surface has no '{}' method", method);
            return;
        };
        let args: js_sys::Array = args.iter().collect();
        if let Err(e) = func.apply(&self.target, &args) {
            log::error!("Map surface '{}' threw: {:?}", method, e);
        }
    }
}

fn to_js_json<T: Serialize + ?Sized>(value: &T) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json) => JsValue::from_str(&json),
        Err(e) => {
            log::error!("Failed to encode value for JS: {}", e);
            JsValue::NULL
        }
    }
}

impl MapSurface for JsMapSurface {
    fn draw_sketch(&mut self, sketch: &Sketch) {
        self.call("drawSketch", &[to_js_json(sketch)]);
    }

    fn show_stats(&mut self, kind: DrawingKind, stats: &DrawingStats) {
        self.call(
            "showStats",
            &[JsValue::from_str(kind.name()), JsValue::from_str(&stats.to_string())],
        );
    }

    fn set_click_capture(&mut self, kind: DrawingKind, capturing: bool) {
        self.call(
            "setClickCapture",
            &[JsValue::from_str(kind.name()), JsValue::from_bool(capturing)],
        );
    }

    fn set_view(&mut self, center: Position, zoom: f64) {
        self.call(
            "setView",
            &[JsValue::from_f64(center.lat), JsValue::from_f64(center.lon), JsValue::from_f64(zoom)],
        );
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        self.call("fitBounds", &[to_js_json(bounds)]);
    }

    fn show_layer(&mut self, layer: &ImportedLayer) {
        self.call("showLayer", &[to_js_json(layer)]);
    }

    fn hide_layer(&mut self, id: &LayerId) {
        self.call("hideLayer", &[JsValue::from_str(id.as_str())]);
    }
}

// ============================================================================
// Single-writer command queue
// ============================================================================

type WebConsoleState = Console<WebBackend, NominatimGeocoder>;

struct Actor {
    /// None while the draining task owns the console.
    console: Option<WebConsoleState>,
    queue: VecDeque<Command>,
    on_change: Option<js_sys::Function>,
}

/// Console handle exported to JavaScript.
#[wasm_bindgen]
pub struct WebConsole {
    inner: Rc<RefCell<Actor>>,
}

#[wasm_bindgen]
impl WebConsole {
    /// Create the console. `surface` is the JS map adapter object.
    #[wasm_bindgen(constructor)]
    pub fn new(surface: JsValue) -> WebConsole {
        let config = AppConfig::load_from_local_storage().unwrap_or_default();
        let mut console = Console::new(
            WebBackend::from_config(&config),
            Box::new(BrowserStorage),
            Box::new(JsMapSurface { target: surface }),
            NominatimGeocoder::new(config.geocoder_url.clone()),
        )
        .with_map_config(config.map);

        let inner = Rc::new(RefCell::new(Actor {
            console: None,
            queue: VecDeque::new(),
            on_change: None,
        }));

        let task_inner = inner.clone();
        spawn_local(async move {
            console.start().await;
            release(&task_inner, console);
            pump(task_inner);
        });

        WebConsole { inner }
    }

    /// Queue a JSON command. Fails only if the command does not parse.
    pub fn dispatch(&self, command_json: &str) -> Result<(), JsValue> {
        let command: Command = serde_json::from_str(command_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid command: {}", e)))?;
        self.inner.borrow_mut().queue.push_back(command);
        pump(self.inner.clone());
        Ok(())
    }

    /// Register a callback receiving the JSON view after each drained batch.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_change = Some(callback);
    }

    /// JSON view of the current state; undefined while commands are running.
    pub fn snapshot(&self) -> Option<String> {
        let actor = self.inner.borrow();
        let console = actor.console.as_ref()?;
        serde_json::to_string(&console.view()).ok()
    }
}

/// Hand the console back to the actor and notify the page.
fn release(inner: &Rc<RefCell<Actor>>, console: WebConsoleState) {
    let view = serde_json::to_string(&console.view()).ok();
    let callback = {
        let mut actor = inner.borrow_mut();
        actor.console = Some(console);
        actor.on_change.clone()
    };
    if let (Some(callback), Some(view)) = (callback, view) {
        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&view)) {
            log::error!("onChange callback threw: {:?}", e);
        }
    }
}

/// Start draining the queue unless a drain is already running.
fn pump(inner: Rc<RefCell<Actor>>) {
    let console = {
        let mut actor = inner.borrow_mut();
        if actor.queue.is_empty() {
            None
        } else {
            actor.console.take()
        }
    };
    let Some(mut console) = console else {
        return;
    };

    spawn_local(async move {
        loop {
            let next = inner.borrow_mut().queue.pop_front();
            let Some(command) = next else {
                break;
            };
            console.dispatch(command).await;
        }
        release(&inner, console);
        pump(inner);
    });
}
