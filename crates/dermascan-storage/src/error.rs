use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {key}")]
    NotFound { key: String },

    #[error("storage quota exceeded ({needed} bytes needed, quota {quota})")]
    QuotaExceeded { needed: u64, quota: u64 },

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("store is closed")]
    Closed,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}
