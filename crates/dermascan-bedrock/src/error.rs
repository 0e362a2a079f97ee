use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("model returned no text")]
    EmptyResponse,

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("AWS config error: {0}")]
    Config(String),
}
