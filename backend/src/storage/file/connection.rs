use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::storage::traits::KeyValueStore;

const DATA_DIRECTORY_NAME: &str = "Quest Board";
const REDIRECT_FILE_NAME: &str = ".quest_board_redirect";
const VALUE_EXTENSION: &str = "json";

/// FileStore keeps one `<key>.json` file per stored value under a base directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_directory: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Open the store in the default data directory.
    /// This uses ~/Documents/Quest Board, but checks for a redirect file first.
    pub fn new_default() -> Result<Self> {
        let documents_dir = dirs::document_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;

        let default_data_dir = documents_dir.join(DATA_DIRECTORY_NAME);
        Self::new(Self::resolve_data_directory(&default_data_dir))
    }

    /// Follow the redirect file in `default_dir` if it names an existing
    /// directory; otherwise stay on `default_dir`
    pub fn resolve_data_directory(default_dir: &Path) -> PathBuf {
        let redirect_file = default_dir.join(REDIRECT_FILE_NAME);

        if !redirect_file.exists() {
            info!("No redirect file found, using data directory: {}", default_dir.display());
            return default_dir.to_path_buf();
        }

        match fs::read_to_string(&redirect_file) {
            Ok(redirected_path) => {
                let redirected_path = redirected_path.trim();
                let path = PathBuf::from(redirected_path);

                if !redirected_path.is_empty() && path.is_dir() {
                    info!("Found redirect file, using data directory: {}", path.display());
                    path
                } else {
                    warn!(
                        "Redirect file points to non-existent directory: {}. Using default.",
                        redirected_path
                    );
                    default_dir.to_path_buf()
                }
            }
            Err(e) => {
                error!("Failed to read redirect file: {}. Using default directory.", e);
                default_dir.to_path_buf()
            }
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    fn value_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(['/', '\\'])
            && !key.chars().any(char::is_control);
        if !valid {
            return Err(anyhow!("Key '{}' cannot be used as a file name", key));
        }
        Ok(self
            .base_directory
            .join(format!("{}.{}", key, VALUE_EXTENSION)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;

        // Write to a temp file, then rename over the target
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", key);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_directory)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(key.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
