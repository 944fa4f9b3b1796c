//! The order editor: one active order, its form and its two drawings.

use crate::drawing::{DrawingKind, DrawingSession};
use crate::error::ConsoleError;
use crate::model::{Geometry, Order, OrderForm, OrderId, OrderStatus, Position, Role};
use crate::permission::{Capability, session_allows};
use crate::store::{OrderBackend, OrderStore};

/// Fail with `PermissionDenied` unless the session role holds `capability`.
pub fn require(role: Option<Role>, capability: Capability) -> Result<(), ConsoleError> {
    if session_allows(role, capability) {
        Ok(())
    } else {
        log::warn!("Denied '{}' for role {:?}", capability, role);
        Err(ConsoleError::denied(capability))
    }
}

/// Editor state machine over an [`OrderStore`].
///
/// Every mutating method takes the current session role and checks it before
/// touching anything, so a denial never leaves partial state behind.
#[derive(Debug)]
pub struct OrderEditor<B> {
    store: OrderStore<B>,
    active: Option<OrderId>,
    form: OrderForm,
    route: DrawingSession,
    area: DrawingSession,
}

impl<B: OrderBackend> OrderEditor<B> {
    pub fn new(store: OrderStore<B>) -> Self {
        Self {
            store,
            active: None,
            form: OrderForm::default(),
            route: DrawingSession::new(DrawingKind::Route),
            area: DrawingSession::new(DrawingKind::Area),
        }
    }

    pub fn store(&self) -> &OrderStore<B> {
        &self.store
    }

    pub fn active_id(&self) -> Option<&OrderId> {
        self.active.as_ref()
    }

    pub fn active_order(&self) -> Option<&Order> {
        self.active.as_ref().and_then(|id| self.store.get(id))
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    pub fn session(&self, kind: DrawingKind) -> &DrawingSession {
        match kind {
            DrawingKind::Route => &self.route,
            DrawingKind::Area => &self.area,
        }
    }

    pub fn session_mut(&mut self, kind: DrawingKind) -> &mut DrawingSession {
        match kind {
            DrawingKind::Route => &mut self.route,
            DrawingKind::Area => &mut self.area,
        }
    }

    pub async fn reload(&mut self) -> Result<usize, ConsoleError> {
        Ok(self.store.reload().await?)
    }

    /// Empty the slot, the form and both drawings. Active flags are kept.
    pub fn reset(&mut self) {
        self.active = None;
        self.form = OrderForm::default();
        self.route.load_existing(None);
        self.area.load_existing(None);
    }

    /// Drop everything loaded for the previous user and stop both drawings.
    ///
    /// Returns the kinds that were still capturing clicks.
    pub fn forget(&mut self) -> Vec<DrawingKind> {
        self.store.forget();
        self.reset();
        DrawingKind::all()
            .iter()
            .copied()
            .filter(|&kind| self.session_mut(kind).stop())
            .collect()
    }

    /// Make a stored order the active one. Returns false for unknown ids.
    pub fn open_order(&mut self, id: &OrderId) -> bool {
        let Some(order) = self.store.get(id) else {
            log::debug!("Open of unknown order {} ignored", id);
            return false;
        };
        self.form = OrderForm::from_order(order);
        let route = order.route.clone().map(Geometry::Path);
        let area = order.area.clone().map(Geometry::Region);
        self.route.load_existing(route.as_ref());
        self.area.load_existing(area.as_ref());
        self.active = Some(id.clone());
        log::info!("Opened order {}", id);
        true
    }

    /// Start a blank order.
    pub fn new_order(&mut self, role: Option<Role>) -> Result<(), ConsoleError> {
        require(role, Capability::Create)?;
        self.reset();
        log::info!("New order");
        Ok(())
    }

    /// Persist the submitted form and re-open the saved order.
    ///
    /// Geometry of an existing order comes from its stored record; a new order
    /// takes whatever the drawing sessions currently hold.
    pub async fn save(&mut self, role: Option<Role>, form: OrderForm) -> Result<OrderId, ConsoleError> {
        let id = form.id.clone().unwrap_or_else(OrderId::generate);
        let existing = self.store.get(&id);
        require(
            role,
            if existing.is_some() {
                Capability::Edit
            } else {
                Capability::Create
            },
        )?;

        let (route, area) = match existing {
            Some(order) => (order.route.clone(), order.area.clone()),
            None => (
                self.route.candidate().and_then(geometry_path),
                self.area.candidate().and_then(geometry_region),
            ),
        };
        let order = form.to_order(id.clone(), route, area);
        self.store.upsert(order).await?;
        self.open_order(&id);
        Ok(id)
    }

    /// Delete the active order. Returns the deleted id, None without one.
    pub async fn delete(&mut self, role: Option<Role>) -> Result<Option<OrderId>, ConsoleError> {
        require(role, Capability::Delete)?;
        let Some(id) = self.active.clone() else {
            return Ok(None);
        };
        self.store.delete(&id).await?;
        self.reset();
        Ok(Some(id))
    }

    /// Change the status control, persisting it for the active order.
    ///
    /// On denial or write failure the control goes back to the persisted
    /// status (the previous form value when nothing is persisted).
    pub async fn change_status(&mut self, role: Option<Role>, status: OrderStatus) -> Result<(), ConsoleError> {
        let persisted = self.active_order().map(|o| o.status).unwrap_or(self.form.status);
        if let Err(e) = require(role, Capability::StatusChange) {
            self.form.status = persisted;
            return Err(e);
        }
        self.form.status = status;
        let Some(mut order) = self.active_order().cloned() else {
            return Ok(());
        };
        order.status = status;
        if let Err(e) = self.store.upsert(order).await {
            self.form.status = persisted;
            return Err(e.into());
        }
        log::info!("Order {} is now {}", self.form.id.as_ref().map_or("?", |id| id.as_str()), status.name());
        Ok(())
    }

    /// Begin capturing clicks for `kind`. Returns false if already capturing.
    pub fn start_drawing(&mut self, role: Option<Role>, kind: DrawingKind) -> Result<bool, ConsoleError> {
        require(role, Capability::RouteEdit)?;
        Ok(self.session_mut(kind).start())
    }

    /// Append a map click to every capturing session; returns how many took it.
    pub fn add_map_point(&mut self, point: Position) -> usize {
        [&mut self.route, &mut self.area]
            .into_iter()
            .map(|session| session.add_point(point))
            .filter(|added| *added)
            .count()
    }

    /// Stop capturing and write the result (possibly none) into the active
    /// order. Finishing with too few points clears the stored geometry.
    pub async fn finish_drawing(
        &mut self,
        role: Option<Role>,
        kind: DrawingKind,
    ) -> Result<Option<Geometry>, ConsoleError> {
        require(role, Capability::RouteEdit)?;
        let geometry = self.session_mut(kind).finish();
        self.attach(role, kind, geometry.clone()).await?;
        Ok(geometry)
    }

    /// Drop the drawn points and clear the active order's geometry.
    pub async fn clear_drawing(&mut self, role: Option<Role>, kind: DrawingKind) -> Result<(), ConsoleError> {
        require(role, Capability::RouteEdit)?;
        self.session_mut(kind).clear();
        self.attach(role, kind, None).await?;
        Ok(())
    }

    /// Store `geometry` as the active order's route or area.
    ///
    /// Returns false when there is no active order.
    pub async fn attach(
        &mut self,
        role: Option<Role>,
        kind: DrawingKind,
        geometry: Option<Geometry>,
    ) -> Result<bool, ConsoleError> {
        let Some(mut order) = self.active_order().cloned() else {
            return Ok(false);
        };
        require(role, Capability::RouteEdit)?;
        match kind {
            DrawingKind::Route => order.route = geometry.and_then(geometry_path),
            DrawingKind::Area => order.area = geometry.and_then(geometry_region),
        }
        self.store.upsert(order).await?;
        log::info!("Attached {} to order {}", kind.name(), self.form.id.as_ref().map_or("?", |id| id.as_str()));
        Ok(true)
    }
}

fn geometry_path(geometry: Geometry) -> Option<crate::model::Path> {
    match geometry {
        Geometry::Path(path) => Some(path),
        Geometry::Region(_) => None,
    }
}

fn geometry_region(geometry: Geometry) -> Option<crate::model::Region> {
    match geometry {
        Geometry::Region(region) => Some(region),
        Geometry::Path(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LocalBackend, MemoryStorage};
    use crate::test_support::sample_order;
    use pollster::block_on;

    const ADMIN: Option<Role> = Some(Role::Admin);
    const OPERATOR: Option<Role> = Some(Role::Operator);
    const SUPERVISOR: Option<Role> = Some(Role::Supervisor);

    fn editor() -> (OrderEditor<LocalBackend<MemoryStorage>>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let store = OrderStore::new(LocalBackend::new(storage.clone()));
        (OrderEditor::new(store), storage)
    }

    fn form(title: &str) -> OrderForm {
        OrderForm {
            title: title.into(),
            pilot: "Ana".into(),
            drone_id: "DJI-01".into(),
            ..OrderForm::default()
        }
    }

    fn draw(editor: &mut OrderEditor<LocalBackend<MemoryStorage>>, kind: DrawingKind, points: &[(f64, f64)]) {
        editor.start_drawing(ADMIN, kind).unwrap();
        for &p in points {
            editor.session_mut(kind).add_point(p.into());
        }
    }

    #[test]
    fn test_new_order_takes_drawn_geometry() {
        let (mut editor, _) = editor();
        draw(&mut editor, DrawingKind::Area, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        draw(&mut editor, DrawingKind::Route, &[(0.0, 0.0)]);

        let id = block_on(editor.save(OPERATOR, form("Survey"))).unwrap();
        let order = editor.store().get(&id).unwrap();
        assert!(order.route.is_none());
        let ring: Vec<(f64, f64)> = order
            .area
            .as_ref()
            .unwrap()
            .ring()
            .iter()
            .map(|p| (p.lon, p.lat))
            .collect();
        assert_eq!(ring, vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert_eq!(editor.active_id(), Some(&id));
        assert_eq!(editor.form().id.as_ref(), Some(&id));
    }

    #[test]
    fn test_update_keeps_stored_geometry() {
        let (mut editor, _) = editor();
        draw(&mut editor, DrawingKind::Route, &[(0.0, 0.0), (1.0, 1.0)]);
        let id = block_on(editor.save(ADMIN, form("First"))).unwrap();

        editor.session_mut(DrawingKind::Route).add_point(Position::new(2.0, 2.0));
        let mut edited = editor.form().clone();
        edited.title = "Second".into();
        block_on(editor.save(SUPERVISOR, edited)).unwrap();

        let order = editor.store().get(&id).unwrap();
        assert_eq!(order.title, "Second");
        assert_eq!(order.route.as_ref().unwrap().points().len(), 2);
        assert_eq!(editor.store().len(), 1);
    }

    #[test]
    fn test_supervisor_cannot_create() {
        let (mut editor, storage) = editor();
        let err = block_on(editor.save(SUPERVISOR, form("Nope"))).unwrap_err();
        assert!(err.is_permission_denied());
        assert!(editor.store().is_empty());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_logged_out_denied_everything() {
        let (mut editor, _) = editor();
        assert!(editor.new_order(None).is_err());
        assert!(editor.start_drawing(None, DrawingKind::Route).is_err());
        assert!(block_on(editor.delete(None)).is_err());
    }

    #[test]
    fn test_open_unknown_is_noop() {
        let (mut editor, _) = editor();
        let id = block_on(editor.save(ADMIN, form("Known"))).unwrap();
        assert!(!editor.open_order(&OrderId::from("unknown")));
        assert_eq!(editor.active_id(), Some(&id));
    }

    #[test]
    fn test_open_loads_geometry_and_form() {
        let (mut editor, mut storage) = editor();
        let mut order = sample_order("x", Some("2025-06-01T08:00"));
        order.route = crate::model::Path::new(vec![Position::new(1.0, 1.0), Position::new(2.0, 2.0)]);
        crate::store::save_json(&mut storage, crate::constants::storage_keys::ORDERS, &vec![order]).unwrap();
        block_on(editor.reload()).unwrap();

        assert!(editor.open_order(&OrderId::from("x")));
        assert_eq!(editor.form().schedule, "2025-06-01T08:00");
        assert_eq!(editor.session(DrawingKind::Route).points().len(), 2);
        assert!(editor.session(DrawingKind::Area).points().is_empty());
    }

    #[test]
    fn test_delete_requires_admin_and_resets() {
        let (mut editor, _) = editor();
        assert_eq!(block_on(editor.delete(ADMIN)).unwrap(), None);

        let id = block_on(editor.save(OPERATOR, form("Doomed"))).unwrap();
        assert!(block_on(editor.delete(OPERATOR)).unwrap_err().is_permission_denied());
        assert!(editor.store().contains(&id));

        assert_eq!(block_on(editor.delete(ADMIN)).unwrap(), Some(id));
        assert!(editor.store().is_empty());
        assert!(editor.active_id().is_none());
        assert_eq!(editor.form(), &OrderForm::default());
    }

    #[test]
    fn test_change_status_persists_and_reverts() {
        let (mut editor, storage) = editor();
        let id = block_on(editor.save(OPERATOR, form("Status"))).unwrap();

        block_on(editor.change_status(SUPERVISOR, OrderStatus::InProgress)).unwrap();
        assert_eq!(editor.store().get(&id).unwrap().status, OrderStatus::InProgress);

        storage.set_fail_writes(true);
        assert!(block_on(editor.change_status(OPERATOR, OrderStatus::Completed)).is_err());
        assert_eq!(editor.form().status, OrderStatus::InProgress);
        assert_eq!(editor.store().get(&id).unwrap().status, OrderStatus::InProgress);

        storage.set_fail_writes(false);
        assert!(block_on(editor.change_status(None, OrderStatus::Cancelled)).is_err());
        assert_eq!(editor.form().status, OrderStatus::InProgress);
    }

    #[test]
    fn test_finish_attaches_and_short_finish_clears() {
        let (mut editor, _) = editor();
        let id = block_on(editor.save(ADMIN, form("Route"))).unwrap();

        draw(&mut editor, DrawingKind::Route, &[(0.0, 0.0), (0.5, 0.5)]);
        let geometry = block_on(editor.finish_drawing(ADMIN, DrawingKind::Route)).unwrap();
        assert!(matches!(geometry, Some(Geometry::Path(_))));
        assert!(editor.store().get(&id).unwrap().route.is_some());

        block_on(editor.clear_drawing(ADMIN, DrawingKind::Route)).unwrap();
        assert!(editor.store().get(&id).unwrap().route.is_none());

        draw(&mut editor, DrawingKind::Route, &[(3.0, 3.0)]);
        assert!(block_on(editor.finish_drawing(ADMIN, DrawingKind::Route)).unwrap().is_none());
        assert!(editor.store().get(&id).unwrap().route.is_none());
    }

    #[test]
    fn test_map_point_goes_to_every_active_session() {
        let (mut editor, _) = editor();
        assert_eq!(editor.add_map_point(Position::new(0.0, 0.0)), 0);
        editor.start_drawing(ADMIN, DrawingKind::Route).unwrap();
        editor.start_drawing(ADMIN, DrawingKind::Area).unwrap();
        assert_eq!(editor.add_map_point(Position::new(0.0, 0.0)), 2);
    }

    #[test]
    fn test_forget_stops_capturing_sessions() {
        let (mut editor, _) = editor();
        draw(&mut editor, DrawingKind::Route, &[(0.0, 0.0)]);
        block_on(editor.save(ADMIN, form("Loaded"))).unwrap();

        assert_eq!(editor.forget(), vec![DrawingKind::Route]);
        assert!(editor.store().is_empty());
        assert!(editor.active_id().is_none());
        assert!(!editor.session(DrawingKind::Route).is_active());
        assert_eq!(editor.add_map_point(Position::new(1.0, 1.0)), 0);
        assert!(editor.forget().is_empty());
    }
}
