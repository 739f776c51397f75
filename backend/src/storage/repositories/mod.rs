//! Typed repositories over the key-value store.
//!
//! Reads never fail outward: a missing, unreadable or unparseable value is
//! logged and treated as the empty default. Writes return their error so the
//! caller decides how loud to be.

pub mod daily_record_repository;
pub mod settings_repository;
pub mod spent_ledger_repository;

pub use daily_record_repository::DailyRecordRepository;
pub use settings_repository::SettingsRepository;
pub use spent_ledger_repository::SpentLedgerRepository;

use log::warn;
use serde::de::DeserializeOwned;

use super::traits::KeyValueStore;

/// Read and parse a JSON value, logging and swallowing any failure
pub(crate) fn read_json<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read storage key {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to parse storage key {}: {}", key, e);
            None
        }
    }
}
