//! # Board Config Repository
//!
//! Keeps `board_config.yaml` at the root of the file store's data directory.
//!
//! ## YAML Format
//!
//! ```yaml
//! namespace: "aurora"
//! data_format_version: "2.0"
//! created_at: "2025-01-21T19:30:00Z"
//! updated_at: "2025-01-21T19:35:00Z"
//! ```

use anyhow::Result;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::FileStore;
use crate::storage::keys::StorageKeys;

const CONFIG_FILE_NAME: &str = "board_config.yaml";

/// Board-level configuration for a data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Prefix of every stored key
    pub namespace: String,
    /// Data format version for future migrations
    pub data_format_version: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            namespace: StorageKeys::DEFAULT_NAMESPACE.to_string(),
            data_format_version: "2.0".to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl BoardConfig {
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::new(self.namespace.clone())
    }
}

#[derive(Debug, Clone)]
pub struct BoardConfigRepository {
    store: FileStore,
}

impl BoardConfigRepository {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    fn config_path(&self) -> PathBuf {
        self.store.base_directory().join(CONFIG_FILE_NAME)
    }

    /// Load the config, creating the default one if it doesn't exist
    pub fn get_board_config(&self) -> Result<BoardConfig> {
        let config_path = self.config_path();

        if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)?;
            let config: BoardConfig = serde_yaml::from_str(&yaml_content)?;
            debug!("Loaded board config from {:?}", config_path);
            Ok(config)
        } else {
            let config = BoardConfig::default();
            self.save_board_config(&config)?;
            info!("Created default board config at {:?}", config_path);
            Ok(config)
        }
    }

    fn save_board_config(&self, config: &BoardConfig) -> Result<()> {
        let config_path = self.config_path();
        let yaml_content = serde_yaml::to_string(config)?;

        // Write to a temp file, then rename
        let temp_path = config_path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &config_path)?;

        debug!("Saved board config to {:?}", config_path);
        Ok(())
    }
}
