use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::error::StorageError;
use crate::store::KeyValueStore;

/// Load a JSON value. Missing and corrupted values both load as `None`.
///
/// Corruption is logged and otherwise ignored: the next save overwrites it.
/// Store failures (I/O, closed store) still propagate.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "ignoring corrupted stored value");
            Ok(None)
        }
    }
}

pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let body = serde_json::to_string(value)?;
    store.set(key, &body)
}
