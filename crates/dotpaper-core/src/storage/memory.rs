//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for tests and hosts without a filesystem.
#[derive(Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, name: &str, contents: &str) -> StorageResult<()> {
        let mut slots = self.slots.write().map_err(lock_error)?;
        slots.insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn load(&self, name: &str) -> StorageResult<String> {
        let slots = self.slots.read().map_err(lock_error)?;
        slots
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        let mut slots = self.slots.write().map_err(lock_error)?;
        slots.remove(name);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let slots = self.slots.read().map_err(lock_error)?;
        let mut names: Vec<String> = slots.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        let slots = self.slots.read().map_err(lock_error)?;
        Ok(slots.contains_key(name))
    }
}
