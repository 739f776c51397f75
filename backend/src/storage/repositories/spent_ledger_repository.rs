use anyhow::Result;
use std::sync::Arc;

use super::read_json;
use crate::domain::dates::MonthKey;
use crate::domain::models::SpentLedger;
use crate::storage::{KeyValueStore, StorageKeys};

/// Monthly spent-star ledgers
#[derive(Clone)]
pub struct SpentLedgerRepository<S: KeyValueStore> {
    store: Arc<S>,
    keys: StorageKeys,
}

impl<S: KeyValueStore> SpentLedgerRepository<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn get(&self, month: MonthKey) -> SpentLedger {
        read_json(self.store.as_ref(), &self.keys.spent(month)).unwrap_or_default()
    }

    pub fn store(&self, month: MonthKey, ledger: &SpentLedger) -> Result<()> {
        let json = serde_json::to_string(ledger)?;
        self.store.put(&self.keys.spent(month), &json)
    }

    pub fn delete(&self, month: MonthKey) -> Result<bool> {
        self.store.remove(&self.keys.spent(month))
    }
}
