//! Named lesion profiles under [`storage_keys::LESIONS`].
//!
//! Deleting a profile does not touch history: records keep their
//! `lesion_id` and simply point at a profile that no longer exists.

use std::ops::{Deref, DerefMut};

use tracing::info;
use uuid::Uuid;

use dermascan_core::models::lesion::LesionProfile;
use dermascan_core::storage_keys;

use crate::error::StorageError;
use crate::state::{load_json, save_json};
use crate::store::KeyValueStore;

/// Wraps `&S` for queries or `&mut S` for updates.
pub struct LesionStore<R> {
    store: R,
}

impl<R> LesionStore<R>
where
    R: Deref,
    R::Target: KeyValueStore,
{
    pub fn new(store: R) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Vec<LesionProfile>, StorageError> {
        Ok(load_json(&*self.store, storage_keys::LESIONS)?.unwrap_or_default())
    }

    /// Profiles in creation order.
    pub fn list(&self) -> Result<Vec<LesionProfile>, StorageError> {
        let mut profiles = self.load()?;
        profiles.sort_by_key(|p| p.created_at);
        Ok(profiles)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<LesionProfile>, StorageError> {
        Ok(self.load()?.into_iter().find(|p| p.id == id))
    }
}

impl<R> LesionStore<R>
where
    R: DerefMut,
    R::Target: KeyValueStore,
{
    fn save(&mut self, profiles: &[LesionProfile]) -> Result<(), StorageError> {
        save_json(&mut *self.store, storage_keys::LESIONS, profiles)
    }

    pub fn create(
        &mut self,
        name: impl Into<String>,
        body_location: impl Into<String>,
    ) -> Result<LesionProfile, StorageError> {
        let profile = LesionProfile::new(name, body_location);
        let mut profiles = self.load()?;
        profiles.push(profile.clone());
        self.save(&profiles)?;
        info!(lesion_id = %profile.id, "lesion profile created");
        Ok(profile)
    }

    pub fn rename(&mut self, id: Uuid, name: impl Into<String>) -> Result<LesionProfile, StorageError> {
        let mut profiles = self.load()?;
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StorageError::NotFound {
                key: format!("{}/{id}", storage_keys::LESIONS),
            })?;
        profile.name = name.into();
        let renamed = profile.clone();
        self.save(&profiles)?;
        Ok(renamed)
    }

    /// Returns whether a profile was removed.
    pub fn delete(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let mut profiles = self.load()?;
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        if profiles.len() == before {
            return Ok(false);
        }
        self.save(&profiles)?;
        info!(lesion_id = %id, "lesion profile deleted");
        Ok(true)
    }
}
