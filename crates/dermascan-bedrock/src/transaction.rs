use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dermascan_core::models::token_count::TokenUsage;

/// The outcome of one model invocation, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult<T> {
    pub id: Uuid,
    pub model_id: String,
    pub usage: TokenUsage,
    pub output: T,
}

impl<T> TransactionResult<T> {
    pub fn new(model_id: impl Into<String>, usage: TokenUsage, output: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            model_id: model_id.into(),
            usage,
            output,
        }
    }
}
