//! Key-value storage slots.
//!
//! Local persistence keeps whole JSON documents under fixed keys (the order
//! collection, the session user). Each write replaces the slot entirely.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::PersistenceError;

/// A string-valued key-value store such as browser `localStorage`.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// Read and decode a JSON slot. A missing slot is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    match storage.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode a value and overwrite the slot.
pub fn save_json<T: Serialize + ?Sized>(
    storage: &mut dyn KeyValueStorage,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Shared in-memory storage. Clones see the same slots.
///
/// Counts writes and can be switched into a failing mode, which makes it the
/// storage of choice for tests and for ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<Cell<usize>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set`/`remove` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Raw slot contents.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    fn check_writable(&self) -> Result<(), PersistenceError> {
        if self.fail_writes.get() {
            return Err(PersistenceError::storage("storage quota exceeded"));
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.slots.borrow_mut().remove(key);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

// ============================================================================
// File storage (native)
// ============================================================================

/// One JSON file per key inside a data directory (native only).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under the platform data directory, if one can be determined.
    pub fn in_default_dir() -> Option<Self> {
        let dir = if let Some(data_dir) = dirs::data_dir() {
            data_dir.join("skysurvey")
        } else {
            dirs::home_dir()?.join(".local").join("share").join("skysurvey")
        };
        Some(Self::new(dir))
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        if !path.exists() {
            log::debug!("No stored '{}' at {:?}", key, path);
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ============================================================================
// Browser storage (WASM)
// ============================================================================

/// `window.localStorage` (WASM only).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        let window = web_sys::window()
            .ok_or_else(|| PersistenceError::storage("No window object available"))?;
        window
            .local_storage()
            .map_err(|e| PersistenceError::storage(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| PersistenceError::storage("localStorage not available"))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| PersistenceError::storage(format!("Failed to read '{}': {:?}", key, e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| PersistenceError::storage(format!("Failed to save '{}': {:?}", key, e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| PersistenceError::storage(format!("Failed to remove '{}': {:?}", key, e)))
    }
}
