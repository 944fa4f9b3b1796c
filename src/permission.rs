//! Role-based permission table.
//!
//! The table is a process-wide constant; lookups are pure and never cached,
//! so every mutating entry point asks again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Role;

/// A named permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Create,
    Edit,
    Delete,
    RouteEdit,
    StatusChange,
    LayerImport,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Create => "create",
            Capability::Edit => "edit",
            Capability::Delete => "delete",
            Capability::RouteEdit => "route-edit",
            Capability::StatusChange => "status-change",
            Capability::LayerImport => "layer-import",
        }
    }

    pub fn all() -> &'static [Capability] {
        &[
            Capability::Create,
            Capability::Edit,
            Capability::Delete,
            Capability::RouteEdit,
            Capability::StatusChange,
            Capability::LayerImport,
        ]
    }
}

impl FromStr for Capability {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::all()
            .iter()
            .copied()
            .find(|cap| cap.name() == s)
            .ok_or(())
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capabilities granted to each role.
const ROLE_TABLE: &[(Role, &[Capability])] = &[
    (
        Role::Admin,
        &[
            Capability::Create,
            Capability::Edit,
            Capability::Delete,
            Capability::RouteEdit,
            Capability::StatusChange,
            Capability::LayerImport,
        ],
    ),
    (
        Role::Operator,
        &[
            Capability::Create,
            Capability::Edit,
            Capability::RouteEdit,
            Capability::StatusChange,
            Capability::LayerImport,
        ],
    ),
    (
        Role::Supervisor,
        &[
            Capability::Edit,
            Capability::StatusChange,
            Capability::LayerImport,
        ],
    ),
];

/// Check whether `role` holds `capability`.
pub fn allows(role: Role, capability: Capability) -> bool {
    ROLE_TABLE
        .iter()
        .find(|(r, _)| *r == role)
        .is_some_and(|(_, caps)| caps.contains(&capability))
}

/// Check a (role name, action name) pair. Unknown names are denied.
pub fn can(role: &str, action: &str) -> bool {
    match (role.parse::<Role>(), action.parse::<Capability>()) {
        (Ok(role), Ok(capability)) => allows(role, capability),
        _ => false,
    }
}

/// Gate check for an optional session role: no session means no permission.
pub fn session_allows(role: Option<Role>, capability: Capability) -> bool {
    role.is_some_and(|role| allows(role, capability))
}
