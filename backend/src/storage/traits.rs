//! # Storage Traits
//!
//! This module defines the storage abstraction that lets the domain layer run
//! against any flat key-value backend (in-process map, files on disk, ...).

use anyhow::Result;

/// A synchronous, string-keyed, string-valued persistent map.
///
/// Writes always replace the whole value for a key; there are no partial or
/// merge writes. Implementations must be usable from a single logical writer
/// without external locking.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any existing value
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key
    /// Returns true if the key existed, false otherwise
    fn remove(&self, key: &str) -> Result<bool>;

    /// List every key in the store, sorted ascending
    fn list_keys(&self) -> Result<Vec<String>>;
}
