use anyhow::Result;
use log::debug;
use shared::Settings;
use std::sync::Arc;

use super::read_json;
use crate::domain::models::StoredSettings;
use crate::storage::{KeyValueStore, StorageKeys};

/// Reads and writes the single settings blob
#[derive(Clone)]
pub struct SettingsRepository<S: KeyValueStore> {
    store: Arc<S>,
    keys: StorageKeys,
}

impl<S: KeyValueStore> SettingsRepository<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    /// The stored settings, or None when nothing usable is stored
    pub fn load(&self) -> Option<StoredSettings> {
        read_json(self.store.as_ref(), &self.keys.settings())
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.store.put(&self.keys.settings(), &json)?;
        debug!(
            "Saved settings ({} heroes, {} quests)",
            settings.heroes.len(),
            settings.quests.len()
        );
        Ok(())
    }
}
