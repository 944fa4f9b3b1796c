//! Login session and enabled controls.

use serde::Serialize;

use crate::constants::storage_keys;
use crate::error::ConsoleError;
use crate::model::{Role, User, default_users};
use crate::permission::{Capability, session_allows};
use crate::store::{KeyValueStorage, load_json, save_json};

/// Which console controls are enabled for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Affordances {
    pub logged_in: bool,
    pub new_order: bool,
    pub save_order: bool,
    pub delete_order: bool,
    pub draw: bool,
    pub change_status: bool,
    pub import_layer: bool,
}

/// Current user plus its persisted record.
pub struct SessionManager {
    storage: Box<dyn KeyValueStorage>,
    users: Vec<User>,
    current: Option<User>,
}

impl SessionManager {
    /// Session over the built-in user directory.
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self::with_users(storage, default_users())
    }

    pub fn with_users(storage: Box<dyn KeyValueStorage>, users: Vec<User>) -> Self {
        Self {
            storage,
            users,
            current: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.current.as_ref().map(|u| u.role)
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Adopt the persisted user record, if any.
    ///
    /// A malformed record is discarded and the session stays logged out.
    pub fn restore(&mut self) -> Option<&User> {
        match load_json::<User>(self.storage.as_ref(), storage_keys::SESSION) {
            Ok(Some(user)) => {
                log::info!("Restored session for '{}' ({})", user.id, user.role);
                self.current = Some(user);
            }
            Ok(None) => {
                log::debug!("No stored session");
            }
            Err(e) => {
                log::warn!("Discarding stored session: {}", e);
                if let Err(e) = self.storage.remove(storage_keys::SESSION) {
                    log::warn!("Failed to remove stored session: {}", e);
                }
            }
        }
        self.current.as_ref()
    }

    /// Log in as a directory user and persist the record.
    pub fn login(&mut self, user_id: &str) -> Result<&User, ConsoleError> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| ConsoleError::UnknownUser(user_id.to_string()))?;
        save_json(self.storage.as_mut(), storage_keys::SESSION, &user)?;
        log::info!("Logged in as '{}' ({})", user.id, user.role);
        Ok(self.current.insert(user))
    }

    /// Drop the session. The in-memory session ends even if removing the
    /// persisted record fails.
    pub fn logout(&mut self) -> Result<(), ConsoleError> {
        if let Some(user) = self.current.take() {
            log::info!("Logged out '{}'", user.id);
        }
        self.storage.remove(storage_keys::SESSION)?;
        Ok(())
    }

    /// Controls enabled for the current role.
    pub fn affordances(&self) -> Affordances {
        let role = self.role();
        let can = |capability| session_allows(role, capability);
        Affordances {
            logged_in: role.is_some(),
            new_order: can(Capability::Create),
            save_order: can(Capability::Create) || can(Capability::Edit),
            delete_order: can(Capability::Delete),
            draw: can(Capability::RouteEdit),
            change_status: can(Capability::StatusChange),
            import_layer: can(Capability::LayerImport),
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("current", &self.current)
            .field("users", &self.users.len())
            .finish()
    }
}
