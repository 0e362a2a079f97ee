//! dermascan-bedrock
//!
//! Prompt assembly and Bedrock Converse invocation for lesion screening.

pub mod client;
pub mod discovery;
pub mod error;
pub mod prompt;
pub mod tokens;
pub mod transaction;

pub use client::{AnalysisClient, BedrockAnalysisClient, BoxFuture};
pub use prompt::{AnalysisPrompt, build_prompt};
pub use transaction::TransactionResult;
