//! User commands accepted by the console.

use serde::{Deserialize, Serialize};

use crate::drawing::DrawingKind;
use crate::layers::LayerId;
use crate::model::{OrderForm, OrderId, OrderStatus};

/// One user action, as sent by a UI shell.
///
/// Serialized as an internally tagged object, e.g.
/// `{"command": "map_click", "lon": -74.08, "lat": 4.60}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Login {
        user_id: String,
    },
    Logout,
    /// Show only orders with this status; None shows all.
    SetFilter {
        #[serde(default)]
        status: Option<OrderStatus>,
    },
    NewOrder,
    OpenOrder {
        id: OrderId,
    },
    SaveOrder {
        form: OrderForm,
    },
    DeleteOrder,
    ChangeStatus {
        status: OrderStatus,
    },
    StartDrawing {
        kind: DrawingKind,
    },
    MapClick {
        lon: f64,
        lat: f64,
    },
    FinishDrawing {
        kind: DrawingKind,
    },
    ClearDrawing {
        kind: DrawingKind,
    },
    /// GeoJSON text read from a user-selected file.
    ImportLayer {
        name: String,
        contents: String,
    },
    ToggleLayer {
        id: LayerId,
    },
    RemoveLayer {
        id: LayerId,
    },
    LookupPlace {
        query: String,
    },
    Reload,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::SetFilter { .. } => "set_filter",
            Command::NewOrder => "new_order",
            Command::OpenOrder { .. } => "open_order",
            Command::SaveOrder { .. } => "save_order",
            Command::DeleteOrder => "delete_order",
            Command::ChangeStatus { .. } => "change_status",
            Command::StartDrawing { .. } => "start_drawing",
            Command::MapClick { .. } => "map_click",
            Command::FinishDrawing { .. } => "finish_drawing",
            Command::ClearDrawing { .. } => "clear_drawing",
            Command::ImportLayer { .. } => "import_layer",
            Command::ToggleLayer { .. } => "toggle_layer",
            Command::RemoveLayer { .. } => "remove_layer",
            Command::LookupPlace { .. } => "lookup_place",
            Command::Reload => "reload",
        }
    }
}

/// What a dispatched command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// State changed as requested.
    Applied,
    /// Nothing to do (unknown id, inactive drawing, empty query...).
    Ignored,
    /// The role lacks the capability; nothing changed.
    Denied,
    /// The action failed (storage, network, parse); nothing changed.
    Failed,
}
