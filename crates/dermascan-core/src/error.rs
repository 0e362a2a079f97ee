use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported image media type: {0}")]
    UnsupportedMediaType(String),

    #[error("invalid image payload: {0}")]
    InvalidImage(String),

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
