//! Persistence backend trait.

use std::future::Future;

use serde::{Deserialize, Serialize};

use super::error::PersistenceError;
use crate::model::{Order, OrderId};

/// Which backend the console persists through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceMode {
    /// Key-value storage on this device
    #[default]
    Local,
    /// Remote order API
    Remote,
}

/// A single mutation of the order collection.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    Create(Order),
    Update(Order),
    Delete(OrderId),
}

impl OrderChange {
    /// Short operation name for logs and the wire discriminator.
    pub fn op(&self) -> &'static str {
        match self {
            OrderChange::Create(_) => "create",
            OrderChange::Update(_) => "update",
            OrderChange::Delete(_) => "delete",
        }
    }
}

/// Storage the order collection is written through.
///
/// Implementations are swappable: the store never knows whether a change
/// lands in local storage or on a server. After every successful
/// [`apply`](OrderBackend::apply) the store calls [`load`](OrderBackend::load)
/// and adopts the backend's view as authoritative.
pub trait OrderBackend {
    /// Which kind of backend this is.
    fn mode(&self) -> PersistenceMode;

    /// Read the full order collection.
    fn load(&mut self) -> impl Future<Output = Result<Vec<Order>, PersistenceError>>;

    /// Persist one change. `snapshot` is the collection with the change applied,
    /// for backends that store whole documents.
    fn apply(
        &mut self,
        change: &OrderChange,
        snapshot: &[Order],
    ) -> impl Future<Output = Result<(), PersistenceError>>;
}
