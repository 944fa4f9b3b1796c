//! Survey order records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::{Path, Region};

/// Opaque, unique order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Planned, not yet flown
    #[default]
    Scheduled,
    /// Flight under way
    InProgress,
    /// Survey delivered
    Completed,
    /// Called off
    Cancelled,
}

impl OrderStatus {
    /// Get the display name for this status.
    pub fn name(&self) -> &'static str {
        match self {
            OrderStatus::Scheduled => "Scheduled",
            OrderStatus::InProgress => "In progress",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// All statuses in workflow order.
    pub fn all() -> &'static [OrderStatus] {
        &[
            OrderStatus::Scheduled,
            OrderStatus::InProgress,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ]
    }
}

/// A schedulable drone survey work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub title: String,
    #[serde(default)]
    pub location: String,
    pub pilot: String,
    pub drone_id: String,
    /// Local date-time text (`YYYY-MM-DDTHH:MM`), compared lexically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub route: Option<Path>,
    #[serde(default)]
    pub area: Option<Region>,
}

impl Order {
    /// Sort key for schedule ordering; a missing schedule sorts first.
    pub fn schedule_key(&self) -> &str {
        self.schedule.as_deref().unwrap_or("")
    }
}

/// Editable order fields, as submitted from the order form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderForm {
    /// Identifier of the order being edited; None for a new order.
    pub id: Option<OrderId>,
    pub title: String,
    pub location: String,
    pub pilot: String,
    pub drone_id: String,
    pub schedule: String,
    pub status: OrderStatus,
}

impl OrderForm {
    /// Fill the form from a stored order.
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: Some(order.id.clone()),
            title: order.title.clone(),
            location: order.location.clone(),
            pilot: order.pilot.clone(),
            drone_id: order.drone_id.clone(),
            schedule: order.schedule.clone().unwrap_or_default(),
            status: order.status,
        }
    }

    /// Build an order record with trimmed text fields and the given geometry.
    pub fn to_order(&self, id: OrderId, route: Option<Path>, area: Option<Region>) -> Order {
        let schedule = self.schedule.trim();
        Order {
            id,
            title: self.title.trim().to_string(),
            location: self.location.trim().to_string(),
            pilot: self.pilot.trim().to_string(),
            drone_id: self.drone_id.trim().to_string(),
            schedule: (!schedule.is_empty()).then(|| schedule.to_string()),
            status: self.status,
            route,
            area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_json_field_names() {
        let order = Order {
            id: OrderId::from("abc1234"),
            title: "Bridge inspection".into(),
            location: "Bogotá".into(),
            pilot: "Ana".into(),
            drone_id: "DR-7".into(),
            schedule: Some("2025-03-01T09:30".into()),
            status: OrderStatus::InProgress,
            route: None,
            area: None,
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["droneId"], "DR-7");
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["route"], serde_json::Value::Null);

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_form_trims_and_drops_blank_schedule() {
        let form = OrderForm {
            title: "  Mapping  ".into(),
            pilot: " Luis".into(),
            schedule: "   ".into(),
            ..Default::default()
        };
        let order = form.to_order(OrderId::from("x"), None, None);
        assert_eq!(order.title, "Mapping");
        assert_eq!(order.pilot, "Luis");
        assert_eq!(order.schedule, None);
        assert_eq!(order.schedule_key(), "");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(OrderId::generate(), OrderId::generate());
    }
}
