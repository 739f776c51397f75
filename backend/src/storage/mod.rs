//! Storage layer: the key-value store abstraction, its in-memory and
//! file-backed implementations, and typed repositories over it.

pub mod file;
pub mod keys;
pub mod memory;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use file::{BoardConfig, BoardConfigRepository, FileStore};
pub use keys::StorageKeys;
pub use memory::MemoryStore;
pub use repositories::{DailyRecordRepository, SettingsRepository, SpentLedgerRepository};
pub use traits::KeyValueStore;
