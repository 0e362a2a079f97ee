//! Model discovery. The live test calls real AWS APIs and needs credentials.
//!
//! Run with: `cargo test -p dermascan-bedrock --test discovery -- --ignored`

use std::collections::HashMap;

use dermascan_bedrock::discovery::{is_context_variant, list_vision_models, resolve_models};
use dermascan_bedrock::tokens::{get_pricing, usage_for};
use dermascan_core::models::token_count::TokenCount;

#[test]
fn context_variants_are_recognized() {
    assert!(is_context_variant("anthropic.claude-3-haiku-20240307-v1:0:48k"));
    assert!(is_context_variant("anthropic.claude-3-haiku-20240307-v1:0:200k"));
    assert!(!is_context_variant("anthropic.claude-3-haiku-20240307-v1:0"));
    assert!(!is_context_variant("anthropic.claude-sonnet-4"));
}

#[test]
fn profiles_are_preferred_and_missing_ones_are_constructed() {
    let foundation = vec![
        (
            "anthropic.claude-sonnet-4-20250514-v1:0".to_string(),
            "Claude Sonnet 4".to_string(),
        ),
        (
            "anthropic.claude-opus-4-1-20250805-v1:0".to_string(),
            "Claude Opus 4.1".to_string(),
        ),
    ];
    let profiles = HashMap::from([(
        "anthropic.claude-sonnet-4-20250514-v1:0".to_string(),
        (
            "us.anthropic.claude-sonnet-4-20250514-v1:0".to_string(),
            "US Anthropic Claude Sonnet 4".to_string(),
        ),
    )]);

    let models = resolve_models(foundation, &profiles);

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name, "Claude Opus 4.1");
    assert_eq!(models[0].model_id, "us.anthropic.claude-opus-4-1-20250805-v1:0");
    assert_eq!(models[1].name, "US Anthropic Claude Sonnet 4");
    assert_eq!(models[1].model_id, "us.anthropic.claude-sonnet-4-20250514-v1:0");
}

#[test]
fn usage_prices_known_models_and_zeroes_unknown_ones() {
    let tokens = TokenCount {
        input: 2_000_000,
        output: 1_000_000,
    };

    let sonnet = usage_for("us.anthropic.claude-sonnet-4-20250514-v1:0", tokens);
    assert!((sonnet.cost_usd - 21.0).abs() < 1e-9);
    assert_eq!(sonnet.tokens, tokens);

    assert!(get_pricing("amazon.nova-pro-v1:0").is_none());
    assert_eq!(usage_for("amazon.nova-pro-v1:0", tokens).cost_usd, 0.0);
}

#[tokio::test]
#[ignore]
async fn lists_vision_models_live() {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new("us-east-1"))
        .load()
        .await;

    let models = list_vision_models(&config).await.expect("list models");
    for m in &models {
        println!("{} ({})", m.name, m.model_id);
    }
    assert!(models.iter().all(|m| m.model_id.starts_with("us.")));
}
