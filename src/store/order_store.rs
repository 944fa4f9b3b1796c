//! In-memory order collection with write-through persistence.

use super::backend::{OrderBackend, OrderChange};
use super::error::PersistenceError;
use crate::model::{Order, OrderId, OrderStatus};

/// Authoritative list of orders plus the backend it is persisted through.
///
/// Mutations are transactional with respect to the in-memory list: the change
/// is applied to a copy, written through the backend, and the list is only
/// replaced by reloading after the write succeeded. Any failure leaves the
/// list exactly as it was.
#[derive(Debug)]
pub struct OrderStore<B> {
    orders: Vec<Order>,
    backend: B,
}

impl<B: OrderBackend> OrderStore<B> {
    /// Create an empty store. Call [`reload`](Self::reload) to populate it.
    pub fn new(backend: B) -> Self {
        Self {
            orders: Vec::new(),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All orders in storage order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders matching `filter` (exact status), sorted by schedule.
    ///
    /// The sort is stable; orders without a schedule come first.
    pub fn list(&self, filter: Option<OrderStatus>) -> Vec<&Order> {
        let mut list: Vec<&Order> = self
            .orders
            .iter()
            .filter(|o| filter.is_none_or(|status| o.status == status))
            .collect();
        list.sort_by(|a, b| a.schedule_key().cmp(b.schedule_key()));
        list
    }

    /// Replace the in-memory list with the backend's collection.
    pub async fn reload(&mut self) -> Result<usize, PersistenceError> {
        let orders = self.backend.load().await?;
        log::debug!("Reloaded {} orders ({:?})", orders.len(), self.backend.mode());
        self.orders = orders;
        Ok(self.orders.len())
    }

    /// Insert a new order or replace the one with the same identifier in place.
    pub async fn upsert(&mut self, order: Order) -> Result<(), PersistenceError> {
        let mut snapshot = self.orders.clone();
        let change = match snapshot.iter().position(|o| o.id == order.id) {
            Some(index) => {
                snapshot[index] = order.clone();
                OrderChange::Update(order)
            }
            None => {
                snapshot.push(order.clone());
                OrderChange::Create(order)
            }
        };
        self.write(change, snapshot).await
    }

    /// Remove an order. Returns false (and writes nothing) if it is absent.
    pub async fn delete(&mut self, id: &OrderId) -> Result<bool, PersistenceError> {
        let Some(index) = self.orders.iter().position(|o| &o.id == id) else {
            log::debug!("Delete of unknown order {} ignored", id);
            return Ok(false);
        };
        let mut snapshot = self.orders.clone();
        snapshot.remove(index);
        self.write(OrderChange::Delete(id.clone()), snapshot).await?;
        Ok(true)
    }

    /// Drop the in-memory list without touching the backend (logout).
    pub fn forget(&mut self) {
        self.orders.clear();
    }

    async fn write(&mut self, change: OrderChange, snapshot: Vec<Order>) -> Result<(), PersistenceError> {
        let op = change.op();
        if let Err(e) = self.backend.apply(&change, &snapshot).await {
            log::error!("Order {} failed: {}", op, e);
            return Err(e);
        }
        self.reload().await?;
        log::info!("Order {} persisted ({} orders)", op, self.orders.len());
        Ok(())
    }
}
