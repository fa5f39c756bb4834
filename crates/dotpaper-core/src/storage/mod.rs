//! Storage abstraction for saved drawings.
//!
//! Slots hold serialized drawings as text. The engine is single-threaded,
//! so the trait is synchronous.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Drawing not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for drawing storage backends.
pub trait Storage: Send + Sync {
    /// Save a drawing under `name`, replacing any previous one.
    fn save(&self, name: &str, contents: &str) -> StorageResult<()>;

    /// Load a drawing.
    fn load(&self, name: &str) -> StorageResult<String>;

    /// Delete a drawing. Deleting a missing drawing is not an error.
    fn delete(&self, name: &str) -> StorageResult<()>;

    /// List all drawing names.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a drawing exists.
    fn exists(&self, name: &str) -> StorageResult<bool>;
}
