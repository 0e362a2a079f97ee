use crate::error::StorageError;

/// String values under string keys, with an explicit lifecycle.
///
/// After [`close`](KeyValueStore::close) every other call fails with
/// [`StorageError::Closed`].
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`. Fails with
    /// [`StorageError::QuotaExceeded`] if the store would exceed its quota,
    /// leaving the previous value in place.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    fn close(&mut self) -> Result<(), StorageError>;
}

/// Fail with `QuotaExceeded` if `others + incoming` exceeds `quota`.
pub(crate) fn check_quota(
    quota: Option<u64>,
    others: u64,
    incoming: u64,
) -> Result<(), StorageError> {
    match quota {
        Some(quota) if others.saturating_add(incoming) > quota => {
            Err(StorageError::QuotaExceeded {
                needed: others.saturating_add(incoming),
                quota,
            })
        }
        _ => Ok(()),
    }
}
