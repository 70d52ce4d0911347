// src/store.rs
use crate::error::{StoreError, StoreResult};
use log;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Names of the records the application keeps in the store.
pub mod keys {
    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "currentUser";
    pub const APPOINTMENTS: &str = "appointments";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const DARK_MODE: &str = "darkMode";

    pub const ALL: [&str; 5] = [USERS, CURRENT_USER, APPOINTMENTS, NOTIFICATIONS, DARK_MODE];
}

const FILE_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// Raw string storage underneath [`KeyValueStore`].
///
/// Backends report every failure; deciding what to do with it is left to the
/// caller.
pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Deleting a key that does not exist succeeds.
    fn delete(&self, key: &str) -> StoreResult<()>;
    /// Removes the records under [`keys::ALL`]. Anything else sharing the
    /// storage is left alone.
    fn clear(&self) -> StoreResult<()>;
}

fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Stores each key as `<root>/<key>.json`.
///
/// Writes go to `<key>.json.tmp` first and are renamed over the record, so a
/// failed write leaves the previous value readable.
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Opens (creating if needed) the data directory.
    pub fn open(root: &Path) -> StoreResult<Self> {
        if !root.exists() {
            fs::create_dir_all(root).map_err(|e| {
                log::error!("Failed to create data directory {:?}: {:?}", root, e);
                StoreError::Io(e)
            })?;
            log::info!("Created data directory: {:?}", root);
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, FILE_EXTENSION)))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let temp_path = self.root.join(format!("{}.{}", key, TEMP_EXTENSION));
        let written = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .and_then(|mut file| {
                file.write_all(value.as_bytes())?;
                file.sync_all()
            });
        if let Err(e) = written {
            log::error!("Failed to write {:?}, keeping the previous record: {:?}", temp_path, e);
            if temp_path.is_file() {
                let _ = fs::remove_file(&temp_path);
            }
            return Err(StoreError::Io(e));
        }
        fs::rename(&temp_path, &path)?;
        log::debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn clear(&self) -> StoreResult<()> {
        for key in keys::ALL {
            self.delete(key)?;
        }
        Ok(())
    }
}

/// Process-local storage, gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    fn entries(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Backend(format!("memory store lock poisoned: {}", e)))
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        Ok(self.entries()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.entries()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut entries = self.entries()?;
        for key in keys::ALL {
            entries.remove(key);
        }
        Ok(())
    }
}

/// JSON key-value store with best-effort semantics.
///
/// No operation returns an error: failures are logged and reported as
/// `false` or `None`, so a caller cannot tell a missing key from an
/// unreadable one.
pub struct KeyValueStore {
    backend: Box<dyn StorageBackend>,
}

impl KeyValueStore {
    pub fn new<B: StorageBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// File-backed store rooted at `data_dir`.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        log::info!("Opening key-value store at {:?}", data_dir);
        Ok(Self::new(FileBackend::open(data_dir)?))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(e) => {
                let err = StoreError::Serialization(e.to_string());
                log::error!("Failed to save {:?}: {}", key, err);
                return false;
            }
        };
        match self.backend.write(key, &serialized) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save {:?}: {}", key, e);
                false
            }
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to read {:?}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                let err = StoreError::Deserialization(e.to_string());
                log::warn!("Ignoring malformed record {:?}: {}", key, err);
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.backend.delete(key) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to remove {:?}: {}", key, e);
                false
            }
        }
    }

    /// Drops every application record.
    pub fn clear(&self) -> bool {
        match self.backend.clear() {
            Ok(()) => {
                log::info!("Key-value store cleared");
                true
            }
            Err(e) => {
                log::error!("Failed to clear store: {}", e);
                false
            }
        }
    }
}
