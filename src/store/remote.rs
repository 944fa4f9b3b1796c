//! Remote persistence through the order API.
//!
//! The API exposes one resource. `GET` returns the collection; `POST` carries
//! a full order record plus an `_op` discriminator (`create`, `update`) or
//! just `{"id", "_op": "delete"}`. Mutation responses are ignored beyond
//! success, since the store always re-lists afterwards.

use std::future::Future;

use serde::Serialize;

use super::backend::{OrderBackend, OrderChange, PersistenceMode};
use super::error::PersistenceError;
use crate::constants::api;
use crate::model::{Order, OrderId};

/// HTTP seam for the remote backend. One call is one network round-trip.
pub trait Transport {
    /// `GET url`, decoding a JSON body.
    fn get_json(&self, url: &str) -> impl Future<Output = Result<serde_json::Value, PersistenceError>>;

    /// `POST url` with a JSON body. Success statuses (including 204) are `Ok`.
    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<(), PersistenceError>>;
}

/// Wire form of a mutation.
#[derive(Serialize)]
#[serde(tag = "_op", rename_all = "lowercase")]
enum RemoteRequest<'a> {
    Create(&'a Order),
    Update(&'a Order),
    Delete { id: &'a OrderId },
}

impl<'a> From<&'a OrderChange> for RemoteRequest<'a> {
    fn from(change: &'a OrderChange) -> Self {
        match change {
            OrderChange::Create(order) => RemoteRequest::Create(order),
            OrderChange::Update(order) => RemoteRequest::Update(order),
            OrderChange::Delete(id) => RemoteRequest::Delete { id },
        }
    }
}

/// Backend issuing one API request per operation.
#[derive(Debug, Clone)]
pub struct RemoteBackend<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> RemoteBackend<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full URL of the order resource.
    pub fn orders_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            api::ORDERS_RESOURCE
        )
    }
}

impl<T: Transport> OrderBackend for RemoteBackend<T> {
    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Remote
    }

    async fn load(&mut self) -> Result<Vec<Order>, PersistenceError> {
        let url = self.orders_url();
        let body = self.transport.get_json(&url).await?;
        let orders: Vec<Order> = serde_json::from_value(body)?;
        log::debug!("Listed {} orders from {}", orders.len(), url);
        Ok(orders)
    }

    async fn apply(&mut self, change: &OrderChange, _snapshot: &[Order]) -> Result<(), PersistenceError> {
        let url = self.orders_url();
        let body = serde_json::to_value(RemoteRequest::from(change))?;
        self.transport.post_json(&url, &body).await?;
        log::info!("Remote {} accepted by {}", change.op(), url);
        Ok(())
    }
}

// ============================================================================
// Browser transport (WASM)
// ============================================================================

/// `fetch`-based transport (WASM only).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
impl Transport for FetchTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, PersistenceError> {
        use gloo_net::http::Request;

        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| PersistenceError::network(e.to_string()))?;
        if !response.ok() {
            return Err(PersistenceError::http(response.status(), response.status_text()));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| PersistenceError::network(format!("Parse error: {}", e)))
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<(), PersistenceError> {
        use gloo_net::http::Request;

        let response = Request::post(url)
            .json(body)
            .map_err(|e| PersistenceError::network(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(|e| PersistenceError::network(e.to_string()))?;
        if !response.ok() {
            return Err(PersistenceError::http(response.status(), response.status_text()));
        }
        Ok(())
    }
}
