use dermascan_core::models::cost::ModelPricing;
use dermascan_core::models::token_count::{TokenCount, TokenUsage};

/// Token counts from a Converse response. Negative counts read as zero.
pub fn extract_token_count(usage: &aws_sdk_bedrockruntime::types::TokenUsage) -> TokenCount {
    TokenCount {
        input: u64::try_from(usage.input_tokens).unwrap_or(0),
        output: u64::try_from(usage.output_tokens).unwrap_or(0),
    }
}

/// Usage with estimated cost. Models without known pricing cost zero.
pub fn usage_for(model_id: &str, tokens: TokenCount) -> TokenUsage {
    match get_pricing(model_id) {
        Some(pricing) => pricing.usage(tokens),
        None => TokenUsage {
            tokens,
            cost_usd: 0.0,
        },
    }
}

/// Approximate on-demand pricing per million tokens for vision-capable
/// Claude models. Matched on the model family, so inference profile IDs work.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    let (input, output) = match model_id {
        id if id.contains("claude-opus-4") => (15.0, 75.0),
        id if id.contains("claude-sonnet-4") || id.contains("claude-3-7-sonnet") => (3.0, 15.0),
        id if id.contains("claude-3-5-sonnet") => (3.0, 15.0),
        id if id.contains("claude-haiku-4") => (1.0, 5.0),
        id if id.contains("claude-3-5-haiku") => (0.80, 4.0),
        id if id.contains("claude-3-haiku") => (0.25, 1.25),
        _ => return None,
    };
    Some(ModelPricing {
        input_per_million: input,
        output_per_million: output,
    })
}
