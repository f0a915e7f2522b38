//! Key-value stores backing the output configuration.

use super::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// External key-value store for settings.
pub trait ConfigStore {
    /// Read a value. `None` when the key was never written.
    fn get(&self, key: &str) -> ConfigResult<Option<Value>>;

    /// Write a value.
    fn set(&mut self, key: &str, value: Value) -> ConfigResult<()>;
}

/// In-memory store for testing and ephemeral use.
#[derive(Debug, Default, Clone)]
pub struct MemoryConfigStore {
    values: HashMap<String, Value>,
}

impl MemoryConfigStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> ConfigResult<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> ConfigResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings kept as a single JSON object in a file.
///
/// The file and its directory are created on the first write.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FileConfigStore {
    /// Open the store at `path`, reading existing settings if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let values = if path.is_file() {
            let json = fs::read_to_string(&path)
                .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
            match serde_json::from_str(&json)? {
                Value::Object(map) => map,
                _ => return Err(ConfigError::NotAnObject(path)),
            }
        } else {
            Map::new()
        };
        log::debug!("Opened settings {} ({} keys)", path.display(), values.len());
        Ok(Self { path, values })
    }

    /// Open the store in the default location.
    ///
    /// On Linux: `~/.config/pixmark/output.json`
    /// On Windows: `%APPDATA%\pixmark\output.json`
    pub fn default_location() -> ConfigResult<Self> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| ConfigError::Io("Could not determine config directory".to_string()))?;
        Self::open(base.join("pixmark").join("output.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::Io(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)
            .map_err(|e| ConfigError::Io(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, key: &str) -> ConfigResult<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> ConfigResult<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}
