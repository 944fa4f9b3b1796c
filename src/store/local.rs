//! Local persistence: the whole collection in one storage slot.

use super::backend::{OrderBackend, OrderChange, PersistenceMode};
use super::error::PersistenceError;
use super::storage::{KeyValueStorage, load_json, save_json};
use crate::constants::storage_keys;
use crate::model::Order;

/// Write-through backend over a [`KeyValueStorage`].
///
/// Every change rewrites the `orders` slot with the full snapshot; reloading
/// re-reads what was just written.
#[derive(Debug, Clone)]
pub struct LocalBackend<S> {
    storage: S,
}

impl<S: KeyValueStorage> LocalBackend<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Decode the stored collection; a slot that does not decode is an error.
    fn read_snapshot(&self) -> Result<Vec<Order>, PersistenceError> {
        match load_json::<Vec<Order>>(&self.storage, storage_keys::ORDERS) {
            Ok(orders) => Ok(orders.unwrap_or_default()),
            Err(PersistenceError::Json(e)) => {
                log::error!("Stored orders could not be parsed: {}", e);
                Err(PersistenceError::Unreadable(e))
            }
            Err(e) => Err(e),
        }
    }
}

impl<S: KeyValueStorage> OrderBackend for LocalBackend<S> {
    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Local
    }

    async fn load(&mut self) -> Result<Vec<Order>, PersistenceError> {
        self.read_snapshot()
    }

    async fn apply(&mut self, change: &OrderChange, snapshot: &[Order]) -> Result<(), PersistenceError> {
        // Never overwrite a collection that could not be read back
        self.read_snapshot()?;
        save_json(&mut self.storage, storage_keys::ORDERS, snapshot)?;
        log::debug!(
            "Local {}: wrote {} orders",
            change.op(),
            snapshot.len()
        );
        Ok(())
    }
}
