// src/preferences.rs
use crate::store::{keys, KeyValueStore};
use std::sync::Arc;

/// Display preferences. Read straight from the store on every call.
pub struct Preferences {
    store: Arc<KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn dark_mode(&self) -> bool {
        self.store.get(keys::DARK_MODE).unwrap_or(false)
    }

    pub fn set_dark_mode(&self, enabled: bool) -> bool {
        log::info!("Dark mode {}", if enabled { "enabled" } else { "disabled" });
        self.store.set(keys::DARK_MODE, &enabled)
    }
}
