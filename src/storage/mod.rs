use std::cell::RefCell;
use std::collections::HashMap;

use log::warn;

use crate::engine::state::{Language, Theme};
use crate::env::{LANG_KEY, THEME_KEY};

/// Key/value persistence for small string preferences.
pub trait PreferenceBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), String>;
}

/// Backend kept in memory; used off the browser and in tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// `window.localStorage`, shared by every page of the origin.
#[cfg(target_arch = "wasm32")]
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    pub fn new() -> Self {
        // Storage can be disabled (private mode, sandboxed frames); reads then
        // behave as unset and writes are reported.
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            warn!("storage: localStorage unavailable; preferences will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl PreferenceBackend for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| "localStorage unavailable".to_owned())?;
        storage
            .set_item(key, value)
            .map_err(|e| format!("setItem({key}) failed: {e:?}"))
    }
}

/// Typed access to the persisted theme and language.
pub struct PreferenceStore<B> {
    backend: B,
}

impl<B: PreferenceBackend> PreferenceStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Stored theme; unrecognized values count as unset.
    pub fn theme(&self) -> Option<Theme> {
        self.backend.read(THEME_KEY).as_deref().and_then(Theme::parse)
    }

    pub fn set_theme(&self, theme: Theme) {
        self.persist(THEME_KEY, theme.as_str());
    }

    /// Stored language, or the primary language when unset.
    pub fn language(&self) -> Language {
        Language::parse_or_primary(self.backend.read(LANG_KEY).as_deref())
    }

    pub fn set_language(&self, language: Language) {
        self.persist(LANG_KEY, language.code());
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(err) = self.backend.write(key, value) {
            warn!("storage: unable to persist {key}={value}: {err}");
        }
    }

    #[cfg(test)]
    fn backend(&self) -> &B {
        &self.backend
    }
}
