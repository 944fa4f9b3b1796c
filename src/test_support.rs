//! Fakes shared by the unit and scenario tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::drawing::{DrawingKind, DrawingStats, Sketch};
use crate::geocode::{GeocodeError, Geocoder};
use crate::layers::{ImportedLayer, LayerId};
use crate::map::{Bounds, MapSurface};
use crate::model::{Order, OrderId, OrderStatus, Position};
use crate::store::{PersistenceError, Transport};

/// A minimal valid order.
pub fn sample_order(id: &str, schedule: Option<&str>) -> Order {
    Order {
        id: OrderId::from(id),
        title: format!("Survey {id}"),
        location: "Sabana de Bogotá".to_string(),
        pilot: "Ana".to_string(),
        drone_id: "DJI-M300".to_string(),
        schedule: schedule.map(str::to_string),
        status: OrderStatus::Scheduled,
        route: None,
        area: None,
    }
}

// ============================================================================
// Order API
// ============================================================================

#[derive(Debug, Default)]
struct ServerState {
    orders: Vec<Order>,
    requests: Vec<String>,
    fail_next_post: Option<u16>,
    fail_next_get: Option<u16>,
}

/// In-process order API. Clones share one server.
#[derive(Debug, Clone, Default)]
pub struct FakeServer {
    state: Rc<RefCell<ServerState>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, orders: Vec<Order>) {
        self.state.borrow_mut().orders = orders;
    }

    pub fn orders(&self) -> Vec<Order> {
        self.state.borrow().orders.clone()
    }

    /// Requests seen so far, as `"GET"` or `"POST <op>"`.
    pub fn requests(&self) -> Vec<String> {
        self.state.borrow().requests.clone()
    }

    pub fn fail_next_post(&self, status: u16) {
        self.state.borrow_mut().fail_next_post = Some(status);
    }

    pub fn fail_next_get(&self, status: u16) {
        self.state.borrow_mut().fail_next_get = Some(status);
    }
}

impl Transport for FakeServer {
    async fn get_json(&self, _url: &str) -> Result<serde_json::Value, PersistenceError> {
        let mut state = self.state.borrow_mut();
        state.requests.push("GET".to_string());
        if let Some(status) = state.fail_next_get.take() {
            return Err(PersistenceError::http(status, "scripted failure"));
        }
        Ok(serde_json::to_value(&state.orders)?)
    }

    async fn post_json(&self, _url: &str, body: &serde_json::Value) -> Result<(), PersistenceError> {
        let mut state = self.state.borrow_mut();
        let op = body.get("_op").and_then(|v| v.as_str()).unwrap_or("?").to_string();
        state.requests.push(format!("POST {op}"));
        if let Some(status) = state.fail_next_post.take() {
            return Err(PersistenceError::http(status, "scripted failure"));
        }
        match op.as_str() {
            "create" => {
                let order: Order = serde_json::from_value(body.clone())?;
                state.orders.push(order);
            }
            "update" => {
                let order: Order = serde_json::from_value(body.clone())?;
                if let Some(slot) = state.orders.iter_mut().find(|o| o.id == order.id) {
                    *slot = order;
                }
            }
            "delete" => {
                let id: OrderId = serde_json::from_value(body["id"].clone())?;
                state.orders.retain(|o| o.id != id);
            }
            _ => return Err(PersistenceError::http(400, "unknown op")),
        }
        Ok(())
    }
}

// ============================================================================
// Map surface
// ============================================================================

/// One call into the map surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Sketch(Sketch),
    Stats(DrawingKind, String),
    Capture(DrawingKind, bool),
    View(Position, f64),
    Fit(Bounds),
    ShowLayer(LayerId),
    HideLayer(LayerId),
}

/// Map surface that records every call. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Rc<RefCell<Vec<SurfaceCall>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    /// Last stats text shown for `kind`.
    pub fn last_stats(&self, kind: DrawingKind) -> Option<String> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            SurfaceCall::Stats(k, text) if *k == kind => Some(text.clone()),
            _ => None,
        })
    }

    /// Last sketch drawn for `kind`.
    pub fn last_sketch(&self, kind: DrawingKind) -> Option<Sketch> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            SurfaceCall::Sketch(s) if s.kind == kind => Some(s.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl MapSurface for RecordingSurface {
    fn draw_sketch(&mut self, sketch: &Sketch) {
        self.record(SurfaceCall::Sketch(sketch.clone()));
    }

    fn show_stats(&mut self, kind: DrawingKind, stats: &DrawingStats) {
        self.record(SurfaceCall::Stats(kind, stats.to_string()));
    }

    fn set_click_capture(&mut self, kind: DrawingKind, capturing: bool) {
        self.record(SurfaceCall::Capture(kind, capturing));
    }

    fn set_view(&mut self, center: Position, zoom: f64) {
        self.record(SurfaceCall::View(center, zoom));
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        self.record(SurfaceCall::Fit(*bounds));
    }

    fn show_layer(&mut self, layer: &ImportedLayer) {
        self.record(SurfaceCall::ShowLayer(layer.id.clone()));
    }

    fn hide_layer(&mut self, id: &LayerId) {
        self.record(SurfaceCall::HideLayer(id.clone()));
    }
}

// ============================================================================
// Geocoder
// ============================================================================

/// Geocoder answering from a fixed table; `"fail"` yields a network error.
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder {
    places: Vec<(String, Position)>,
}

impl FixedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, name: &str, position: Position) -> Self {
        self.places.push((name.to_lowercase(), position));
        self
    }
}

impl Geocoder for FixedGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Position>, GeocodeError> {
        if query == "fail" {
            return Err(GeocodeError::Network("connection refused".to_string()));
        }
        let query = query.to_lowercase();
        Ok(self
            .places
            .iter()
            .find(|(name, _)| *name == query)
            .map(|(_, position)| *position))
    }
}
