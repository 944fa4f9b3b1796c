//! Console users and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A role from the static permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
    Supervisor,
}

impl Role {
    /// Role name as used in the permission table and persisted records.
    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Supervisor => "supervisor",
        }
    }

    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Operator, Role::Supervisor]
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::all()
            .iter()
            .copied()
            .find(|role| role.name() == s)
            .ok_or(())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A console user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(id: &str, name: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role,
        }
    }
}

/// The built-in user directory offered on the login screen.
pub fn default_users() -> Vec<User> {
    vec![
        User::new("admin", "Admin", Role::Admin),
        User::new("op1", "Operator 1", Role::Operator),
        User::new("sup1", "Supervisor", Role::Supervisor),
    ]
}
