//! Order persistence.
//!
//! [`OrderStore`] owns the in-memory collection and writes every change
//! through an [`OrderBackend`]:
//!
//! - [`LocalBackend`]: the whole collection as one JSON document in a
//!   [`KeyValueStorage`] slot (browser `localStorage`, files, or memory)
//! - [`RemoteBackend`]: one API request per operation over a [`Transport`]

mod backend;
mod error;
mod local;
mod order_store;
mod remote;
mod storage;

pub use backend::{OrderBackend, OrderChange, PersistenceMode};
pub use error::PersistenceError;
pub use local::LocalBackend;
pub use order_store::OrderStore;
pub use remote::{RemoteBackend, Transport};
pub use storage::{KeyValueStorage, MemoryStorage, load_json, save_json};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use remote::FetchTransport;
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
