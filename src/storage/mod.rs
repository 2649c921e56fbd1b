//! Key-value persistence providers
//!
//! Anything offering `get`/`set`/`remove` over string keys and values can
//! back the dashboard. [`persistence::Persistence`] layers the dashboard's
//! key layout and failure policy on top.

pub mod file;
pub mod keys;
pub mod memory;
pub mod persistence;

use crate::core::error::StorageError;

/// Trait for pluggable key-value storage backends.
///
/// Implementations must be thread-safe (Send + Sync) so they can be shared
/// behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Retrieves a value by key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores a value, replacing any existing one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes a key.
    ///
    /// Returns `Ok(())` even if the key doesn't exist (idempotent).
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
