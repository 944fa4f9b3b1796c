//! Errors surfaced to the console user.

use thiserror::Error;

use crate::geocode::GeocodeError;
use crate::layers::LayerError;
use crate::permission::Capability;
use crate::store::PersistenceError;

/// Failure of a user-initiated action.
///
/// Every variant ends at the console's command boundary as a visible notice;
/// the state the action would have changed is left as it was.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The current role lacks the capability; the action never started.
    #[error("Permission denied: '{capability}' is not allowed for this user")]
    PermissionDenied {
        /// The capability that was required
        capability: Capability,
    },

    /// Storage or network write/read failed.
    #[error("Order storage failed: {0}")]
    Persistence(#[from] PersistenceError),

    /// An imported file could not be parsed.
    #[error("Invalid layer file: {0}")]
    MalformedInput(#[from] LayerError),

    /// Login attempted with an id that is not in the user directory.
    #[error("Unknown user '{0}'")]
    UnknownUser(String),

    /// Place lookup service failed.
    #[error("Location lookup failed: {0}")]
    Geocode(#[from] GeocodeError),
}

impl ConsoleError {
    pub fn denied(capability: Capability) -> Self {
        Self::PermissionDenied { capability }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
