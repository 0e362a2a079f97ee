//! Analysis history under [`storage_keys::HISTORY`].
//!
//! Records are kept oldest first on disk and returned newest first. The list
//! is capped; appending past the cap evicts the oldest records.

use std::ops::{Deref, DerefMut};

use tracing::{info, warn};
use uuid::Uuid;

use dermascan_core::models::history::HistoryRecord;
use dermascan_core::models::metrics::ParsedMetrics;
use dermascan_core::storage_keys;

use crate::error::StorageError;
use crate::state::{load_json, save_json};
use crate::store::KeyValueStore;

/// What [`HistoryStore::append`] had to do to fit the new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Stored; `evicted` oldest records were dropped to respect the cap.
    Stored { evicted: usize },
    /// The store was over quota, so only the new record was kept.
    KeptNewestOnly { dropped: usize },
}

/// Wraps `&S` for queries or `&mut S` for updates.
pub struct HistoryStore<R> {
    store: R,
}

impl<R> HistoryStore<R>
where
    R: Deref,
    R::Target: KeyValueStore,
{
    pub fn new(store: R) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        Ok(load_json(&*self.store, storage_keys::HISTORY)?.unwrap_or_default())
    }

    /// All records, newest first.
    pub fn list(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        let mut records = self.load()?;
        records.reverse();
        Ok(records)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<HistoryRecord>, StorageError> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    /// Records linked to a lesion, newest first.
    pub fn for_lesion(&self, lesion_id: Uuid) -> Result<Vec<HistoryRecord>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.lesion_id == Some(lesion_id))
            .collect())
    }
}

impl<R> HistoryStore<R>
where
    R: DerefMut,
    R::Target: KeyValueStore,
{
    fn save(&mut self, records: &[HistoryRecord]) -> Result<(), StorageError> {
        if records.is_empty() {
            return self.store.remove(storage_keys::HISTORY);
        }
        save_json(&mut *self.store, storage_keys::HISTORY, records)
    }

    /// Insert a record, keeping at most `cap` records (minimum one).
    ///
    /// If the store is over quota the history is replaced by the new record
    /// alone. Only when even that does not fit is the quota error returned.
    pub fn append(
        &mut self,
        record: HistoryRecord,
        cap: usize,
    ) -> Result<AppendOutcome, StorageError> {
        let cap = cap.max(1);
        let mut records = self.load()?;
        records.retain(|r| r.id != record.id);
        records.push(record.clone());
        records.sort_by_key(|r| r.timestamp);

        let evicted = records.len().saturating_sub(cap);
        records.drain(..evicted);

        match self.save(&records) {
            Ok(()) => {
                info!(record_id = %record.id, total = records.len(), evicted, "history record saved");
                Ok(AppendOutcome::Stored { evicted })
            }
            Err(e) if e.is_quota_exceeded() => {
                let dropped = records.len() - 1;
                warn!(
                    record_id = %record.id,
                    dropped,
                    error = %e,
                    "history over quota, keeping newest record only"
                );
                self.save(std::slice::from_ref(&record))?;
                Ok(AppendOutcome::KeptNewestOnly { dropped })
            }
            Err(e) => Err(e),
        }
    }

    /// Returns whether a record was removed.
    pub fn delete(&mut self, id: Uuid) -> Result<bool, StorageError> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(storage_keys::HISTORY)
    }

    /// Link a record to a lesion, or unlink it with `None`.
    pub fn assign_lesion(&mut self, id: Uuid, lesion_id: Option<Uuid>) -> Result<(), StorageError> {
        self.update(id, |r| r.lesion_id = lesion_id)
    }

    pub fn cache_metrics(&mut self, id: Uuid, metrics: ParsedMetrics) -> Result<(), StorageError> {
        self.update(id, |r| r.metrics = Some(metrics))
    }

    /// Drop the oldest records beyond `cap`. Returns how many were removed.
    pub fn trim(&mut self, cap: usize) -> Result<usize, StorageError> {
        let mut records = self.load()?;
        let excess = records.len().saturating_sub(cap.max(1));
        if excess > 0 {
            records.drain(..excess);
            self.save(&records)?;
            info!(removed = excess, remaining = records.len(), "history trimmed");
        }
        Ok(excess)
    }

    fn update(
        &mut self,
        id: Uuid,
        apply: impl FnOnce(&mut HistoryRecord),
    ) -> Result<(), StorageError> {
        let mut records = self.load()?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StorageError::NotFound {
                key: format!("{}/{id}", storage_keys::HISTORY),
            })?;
        apply(record);
        self.save(&records)
    }
}
