//! Data models for the survey console.

mod geometry;
mod order;
mod user;

pub use geometry::{Geometry, GeometryError, Path, Position, Region};
pub use order::{Order, OrderForm, OrderId, OrderStatus};
pub use user::{Role, User, default_users};
