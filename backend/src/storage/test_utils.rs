/// Test utilities for file-backed storage.
///
/// `TestEnvironment` owns a temporary data directory that is removed when the
/// environment is dropped, even if the test panics.
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use super::file::{BoardConfigRepository, FileStore};
use super::keys::StorageKeys;

pub struct TestEnvironment {
    pub store: Arc<FileStore>,
    pub keys: StorageKeys,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    /// Create a new test environment with a temporary directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let store = FileStore::new(temp_dir.path())?;
        let keys = BoardConfigRepository::new(store.clone())
            .get_board_config()?
            .storage_keys();

        Ok(Self {
            store: Arc::new(store),
            keys,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    /// Path of the file holding `key`
    pub fn value_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;
        {
            let env = TestEnvironment::new()?;
            base_path = env.base_path.clone();
            assert!(base_path.exists());
            assert!(base_path.join("board_config.yaml").exists());
            // Environment dropped here
        }
        assert!(!base_path.exists());
        Ok(())
    }
}
