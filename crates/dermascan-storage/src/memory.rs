use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::store::{KeyValueStore, check_quota};

/// In-process store, used by tests and hosts without a writable disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    quota: Option<u64>,
    closed: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: u64) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Bytes currently held across all keys.
    pub fn used_bytes(&self) -> u64 {
        self.values.values().map(|v| v.len() as u64).sum()
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.closed {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_open()?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_open()?;
        let others = self.used_bytes() - self.values.get(key).map_or(0, |v| v.len() as u64);
        check_quota(self.quota, others, value.len() as u64)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.ensure_open()?;
        self.values.remove(key);
        Ok(())
    }

    fn close(&mut self) -> Result<(), StorageError> {
        self.closed = true;
        Ok(())
    }
}
