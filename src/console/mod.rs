//! The survey console: single owner of all application state.
//!
//! UI shells translate user input into [`Command`]s and hand them to
//! [`Console::dispatch`], one at a time. Each command runs to completion,
//! including any storage or network round-trip, before the next starts.
//! Errors never escape `dispatch`; they become notices.

mod command;

#[cfg(test)]
mod tests;

pub use command::{Command, Outcome};

use serde::Serialize;

use crate::config::MapConfig;
use crate::drawing::DrawingKind;
use crate::editor::{OrderEditor, require};
use crate::error::ConsoleError;
use crate::geocode::Geocoder;
use crate::layers::{LayerId, LayerSet};
use crate::map::{Bounds, MapSurface};
use crate::model::{Order, OrderForm, OrderId, OrderStatus, Position, User};
use crate::notice::{Notice, NoticeLog};
use crate::permission::Capability;
use crate::session::{Affordances, SessionManager};
use crate::store::{KeyValueStorage, OrderBackend, OrderStore};

/// Application state plus the surfaces it renders into.
pub struct Console<B, G> {
    session: SessionManager,
    editor: OrderEditor<B>,
    layers: LayerSet,
    notices: NoticeLog,
    surface: Box<dyn MapSurface>,
    geocoder: G,
    map: MapConfig,
    filter: Option<OrderStatus>,
}

impl<B: OrderBackend, G: Geocoder> Console<B, G> {
    /// Create a console persisting orders through `backend` and the session
    /// record in `session_storage`.
    pub fn new(
        backend: B,
        session_storage: Box<dyn KeyValueStorage>,
        surface: Box<dyn MapSurface>,
        geocoder: G,
    ) -> Self {
        Self {
            session: SessionManager::new(session_storage),
            editor: OrderEditor::new(OrderStore::new(backend)),
            layers: LayerSet::new(),
            notices: NoticeLog::new(),
            surface,
            geocoder,
            map: MapConfig::default(),
            filter: None,
        }
    }

    /// Use map defaults from the configuration.
    pub fn with_map_config(mut self, map: MapConfig) -> Self {
        self.map = map;
        self
    }

    /// Show the initial view, restore a persisted session and load its orders.
    pub async fn start(&mut self) -> Outcome {
        self.surface.set_view(self.map.center, self.map.zoom);
        let outcome = if self.session.restore().is_some() {
            match self.editor.reload().await {
                Ok(_) => Outcome::Applied,
                Err(e) => self.report(e),
            }
        } else {
            Outcome::Ignored
        };
        self.render();
        outcome
    }

    /// Run one command to completion.
    pub async fn dispatch(&mut self, command: Command) -> Outcome {
        let name = command.name();
        log::debug!("Dispatching {}", name);
        let outcome = match self.run(command).await {
            Ok(true) => Outcome::Applied,
            Ok(false) => Outcome::Ignored,
            Err(e) => self.report(e),
        };
        self.render();
        log::debug!("{} -> {:?}", name, outcome);
        outcome
    }

    fn report(&mut self, error: ConsoleError) -> Outcome {
        if error.is_permission_denied() {
            self.notices.warn(error.to_string());
            Outcome::Denied
        } else {
            self.notices.error(error.to_string());
            Outcome::Failed
        }
    }

    async fn run(&mut self, command: Command) -> Result<bool, ConsoleError> {
        let role = self.session.role();
        match command {
            Command::Login { user_id } => {
                let name = self.session.login(&user_id)?.name.clone();
                self.forget_user_state();
                self.notices.info(format!("Welcome, {name}"));
                self.editor.reload().await?;
                Ok(true)
            }
            Command::Logout => {
                if !self.session.is_logged_in() {
                    return Ok(false);
                }
                let result = self.session.logout();
                self.forget_user_state();
                result?;
                self.notices.info("Logged out");
                Ok(true)
            }
            Command::SetFilter { status } => {
                self.filter = status;
                Ok(true)
            }
            Command::Reload => {
                if !self.session.is_logged_in() {
                    return Ok(false);
                }
                self.editor.reload().await?;
                Ok(true)
            }
            Command::NewOrder => {
                self.editor.new_order(role)?;
                Ok(true)
            }
            Command::OpenOrder { id } => Ok(self.editor.open_order(&id)),
            Command::SaveOrder { form } => {
                self.editor.save(role, form).await?;
                self.notices.info("Order saved");
                Ok(true)
            }
            Command::DeleteOrder => match self.editor.delete(role).await? {
                Some(id) => {
                    self.notices.info(format!("Order {id} deleted"));
                    Ok(true)
                }
                None => Ok(false),
            },
            Command::ChangeStatus { status } => {
                self.editor.change_status(role, status).await?;
                Ok(true)
            }
            Command::StartDrawing { kind } => {
                let started = self.editor.start_drawing(role, kind)?;
                if started {
                    self.surface.set_click_capture(kind, true);
                }
                Ok(started)
            }
            Command::MapClick { lon, lat } => {
                if !(lon.is_finite() && lat.is_finite()) {
                    return Ok(false);
                }
                Ok(self.editor.add_map_point(Position::new(lon, lat)) > 0)
            }
            Command::FinishDrawing { kind } => {
                let was_active = self.editor.session(kind).is_active();
                let result = self.editor.finish_drawing(role, kind).await;
                if was_active && !self.editor.session(kind).is_active() {
                    self.surface.set_click_capture(kind, false);
                }
                let geometry = result?;
                if geometry.is_none() {
                    self.notices.warn(format!(
                        "Drawing needs at least {} points; {} cleared",
                        kind.min_points(),
                        kind.name()
                    ));
                }
                Ok(true)
            }
            Command::ClearDrawing { kind } => {
                self.editor.clear_drawing(role, kind).await?;
                Ok(true)
            }
            Command::ImportLayer { name, contents } => {
                require(role, Capability::LayerImport)?;
                let layer = self.layers.import(&name, &contents)?;
                self.surface.show_layer(layer);
                if let Some(bounds) = layer.collection.bounds().filter(Bounds::is_valid) {
                    self.surface.fit_bounds(&bounds);
                }
                self.notices.info(format!("Layer '{}' loaded", layer.name));
                Ok(true)
            }
            Command::ToggleLayer { id } => match self.layers.toggle(&id) {
                Some(layer) if layer.visible => {
                    self.surface.show_layer(layer);
                    Ok(true)
                }
                Some(layer) => {
                    self.surface.hide_layer(&layer.id);
                    Ok(true)
                }
                None => Ok(false),
            },
            Command::RemoveLayer { id } => match self.layers.remove(&id) {
                Some(layer) => {
                    self.surface.hide_layer(&layer.id);
                    Ok(true)
                }
                None => Ok(false),
            },
            Command::LookupPlace { query } => {
                let query = query.trim();
                if query.is_empty() {
                    return Ok(false);
                }
                match self.geocoder.search(query).await? {
                    Some(position) => {
                        self.surface.set_view(position, self.map.place_zoom);
                        Ok(true)
                    }
                    None => {
                        self.notices.warn("Location not found");
                        Ok(false)
                    }
                }
            }
        }
    }

    /// Drop the previous user's orders and release any click capture.
    fn forget_user_state(&mut self) {
        for kind in self.editor.forget() {
            self.surface.set_click_capture(kind, false);
        }
    }

    /// Push changed drawings to the map surface.
    fn render(&mut self) {
        for &kind in DrawingKind::all() {
            let session = self.editor.session_mut(kind);
            if session.is_dirty() {
                self.surface.draw_sketch(&session.sketch());
                self.surface.show_stats(kind, &session.stats());
                session.clear_dirty();
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn affordances(&self) -> Affordances {
        self.session.affordances()
    }

    pub fn editor(&self) -> &OrderEditor<B> {
        &self.editor
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    /// Take all pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    pub fn filter(&self) -> Option<OrderStatus> {
        self.filter
    }

    /// Orders passing the current filter, sorted by schedule.
    pub fn visible_orders(&self) -> Vec<&Order> {
        self.editor.store().list(self.filter)
    }

    /// Serializable snapshot for UI shells.
    pub fn view(&self) -> ConsoleView<'_> {
        let drawing = |kind: DrawingKind| {
            let session = self.editor.session(kind);
            DrawingView {
                active: session.is_active(),
                points: session.points().len(),
                stats: session.stats().to_string(),
            }
        };
        ConsoleView {
            user: self.session.user(),
            affordances: self.session.affordances(),
            filter: self.filter,
            orders: self.visible_orders(),
            active_order: self.editor.active_id(),
            form: self.editor.form(),
            route: drawing(DrawingKind::Route),
            area: drawing(DrawingKind::Area),
            layers: self
                .layers
                .iter()
                .map(|l| LayerView {
                    id: &l.id,
                    name: &l.name,
                    visible: l.visible,
                })
                .collect(),
            notices: self.notices.iter().collect(),
        }
    }
}

/// Everything a UI shell needs to redraw its panels.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleView<'a> {
    pub user: Option<&'a User>,
    pub affordances: Affordances,
    pub filter: Option<OrderStatus>,
    pub orders: Vec<&'a Order>,
    pub active_order: Option<&'a OrderId>,
    pub form: &'a OrderForm,
    pub route: DrawingView,
    pub area: DrawingView,
    pub layers: Vec<LayerView<'a>>,
    pub notices: Vec<&'a Notice>,
}

#[derive(Debug, Serialize)]
pub struct DrawingView {
    pub active: bool,
    pub points: usize,
    pub stats: String,
}

#[derive(Debug, Serialize)]
pub struct LayerView<'a> {
    pub id: &'a LayerId,
    pub name: &'a str,
    pub visible: bool,
}
