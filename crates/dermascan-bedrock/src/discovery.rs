//! Vision model discovery.
//!
//! The picker only offers models that can read an image. We start from the
//! foundation model registry (`ACTIVE` Anthropic models whose input
//! modalities include images) and map each to its `us.` inference profile,
//! since Converse rejects bare model IDs for on-demand throughput. When the
//! profile list has no entry for a model, `us.{model_id}` is used.

use std::collections::HashMap;

use aws_sdk_bedrock::types::{
    FoundationModelLifecycleStatus, InferenceProfileStatus, InferenceProfileType, ModelModality,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BedrockError;

const US_SCOPE: &str = "us.";

/// A model offered for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionModel {
    /// Inference profile ID, e.g. `us.anthropic.claude-sonnet-4-20250514-v1:0`.
    pub model_id: String,
    pub name: String,
}

/// List image-capable models, sorted by name.
pub async fn list_vision_models(
    config: &aws_config::SdkConfig,
) -> Result<Vec<VisionModel>, BedrockError> {
    let client = aws_sdk_bedrock::Client::new(config);

    let foundation = fetch_image_foundation_models(&client).await?;
    let profiles = fetch_us_profiles(&client).await?;
    let models = resolve_models(foundation, &profiles);

    info!(count = models.len(), "discovered vision models");
    Ok(models)
}

/// Pair foundation models with their US inference profiles.
///
/// `profiles` maps a bare foundation model ID to `(profile_id, profile_name)`.
pub fn resolve_models(
    foundation: Vec<(String, String)>,
    profiles: &HashMap<String, (String, String)>,
) -> Vec<VisionModel> {
    let mut models: Vec<VisionModel> = foundation
        .into_iter()
        .map(|(model_id, name)| match profiles.get(&model_id) {
            Some((profile_id, profile_name)) => VisionModel {
                model_id: profile_id.clone(),
                name: profile_name.clone(),
            },
            None => VisionModel {
                model_id: format!("{US_SCOPE}{model_id}"),
                name,
            },
        })
        .collect();
    models.sort_by(|a, b| a.name.cmp(&b.name));
    models
}

/// Context-window variants such as `:48k` or `:200k`. The `:0` version
/// suffix is not a variant.
pub fn is_context_variant(model_id: &str) -> bool {
    model_id.rsplit_once(':').is_some_and(|(_, suffix)| {
        suffix != "0" && suffix.chars().next().is_some_and(|c| c.is_ascii_digit())
    })
}

async fn fetch_image_foundation_models(
    client: &aws_sdk_bedrock::Client,
) -> Result<Vec<(String, String)>, BedrockError> {
    let response = client
        .list_foundation_models()
        .by_provider("anthropic")
        .by_output_modality(ModelModality::Text)
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    Ok(response
        .model_summaries()
        .iter()
        .filter(|m| {
            let active = m
                .model_lifecycle()
                .is_some_and(|lc| *lc.status() == FoundationModelLifecycleStatus::Active);
            let reads_images = m.input_modalities().contains(&ModelModality::Image);
            active && reads_images && !is_context_variant(m.model_id())
        })
        .map(|m| {
            let name = m.model_name().unwrap_or(m.model_id()).to_string();
            (m.model_id().to_string(), name)
        })
        .collect())
}

async fn fetch_us_profiles(
    client: &aws_sdk_bedrock::Client,
) -> Result<HashMap<String, (String, String)>, BedrockError> {
    let response = client
        .list_inference_profiles()
        .type_equals(InferenceProfileType::SystemDefined)
        .max_results(100)
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    Ok(response
        .inference_profile_summaries()
        .iter()
        .filter(|p| *p.status() == InferenceProfileStatus::Active)
        .filter_map(|p| {
            let id = p.inference_profile_id();
            let bare = id.strip_prefix(US_SCOPE)?;
            Some((
                bare.to_string(),
                (id.to_string(), p.inference_profile_name().to_string()),
            ))
        })
        .collect())
}
