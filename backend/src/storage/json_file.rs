use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use super::traits::PreferenceStorage;

const PREFERENCES_FILE: &str = "preferences.json";

/// Preference store backed by a single `preferences.json` object in the data directory
#[derive(Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Arc<Mutex<()>>,
}

impl JsonFilePreferenceStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let path = data_dir.join(PREFERENCES_FILE);
        info!("Preference store at {}", path.display());

        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                warn!(
                    "Preference file {} is not a JSON object, starting empty",
                    self.path.display()
                );
                Ok(Map::new())
            }
        }
    }

    fn write_all(&self, values: &Map<String, Value>) -> Result<()> {
        let content = serde_json::to_string_pretty(values)?;

        // Atomic write using temp file
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl PreferenceStorage for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.read_all()?;
        Ok(values.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        values.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&values)?;
        debug!("Stored preference {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
            debug!("Removed preference {}", key);
        }
        Ok(())
    }
}
