use std::ops::{Deref, DerefMut};

use tracing::info;

use dermascan_core::models::settings::Settings;
use dermascan_core::storage_keys;

use crate::error::StorageError;
use crate::history::HistoryStore;
use crate::state::{load_json, save_json};
use crate::store::KeyValueStore;

/// Wraps `&S` for queries or `&mut S` for updates.
pub struct SettingsStore<R> {
    store: R,
}

impl<R> SettingsStore<R>
where
    R: Deref,
    R::Target: KeyValueStore,
{
    pub fn new(store: R) -> Self {
        Self { store }
    }

    /// Stored settings, or defaults when missing or corrupted.
    pub fn load(&self) -> Result<Settings, StorageError> {
        Ok(load_json(&*self.store, storage_keys::SETTINGS)?.unwrap_or_default())
    }
}

impl<R> SettingsStore<R>
where
    R: DerefMut,
    R::Target: KeyValueStore,
{
    pub fn save(&mut self, settings: &Settings) -> Result<(), StorageError> {
        save_json(&mut *self.store, storage_keys::SETTINGS, settings)
    }

    /// Change the history cap and trim existing history to it.
    pub fn set_history_cap(&mut self, cap: usize) -> Result<Settings, StorageError> {
        let mut settings = self.load()?;
        settings.history_cap = cap.max(1);
        self.save(&settings)?;

        let removed = HistoryStore::new(&mut *self.store).trim(settings.history_cap)?;
        info!(cap = settings.history_cap, removed, "history cap updated");
        Ok(settings)
    }
}
