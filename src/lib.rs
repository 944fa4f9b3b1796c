//! SkySurvey - drone survey order console
//!
//! Schedules drone survey work orders, lets operators draw flight routes and
//! survey areas on a map, and persists orders locally or through a remote
//! order API, gated by a role-based permission table.

pub mod config;
pub mod console;
pub mod constants;
pub mod drawing;
pub mod editor;
pub mod error;
pub mod geocode;
pub mod layers;
pub mod map;
pub mod measure;
pub mod model;
pub mod notice;
pub mod permission;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;
pub use console::{Command, Console, Outcome};
pub use error::ConsoleError;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
