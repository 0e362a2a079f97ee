//! Analysis invocation via the Bedrock Converse API.
//!
//! One request per analysis: the system instruction, then a user message
//! carrying the image block followed by the text block. No retries beyond the
//! SDK's own.

use std::future::Future;
use std::pin::Pin;

use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ImageBlock, ImageFormat, ImageSource, Message,
    SystemContentBlock,
};
use tracing::info;

use dermascan_core::models::request::ImageMediaType;
use dermascan_core::models::response::AnalysisResponse;
use dermascan_screening::citations::extract_link_citations;

use crate::error::BedrockError;
use crate::prompt::AnalysisPrompt;
use crate::tokens;
use crate::transaction::TransactionResult;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sends a prepared prompt to a vision model.
pub trait AnalysisClient: Send + Sync {
    fn analyze<'a>(
        &'a self,
        prompt: &'a AnalysisPrompt,
        model_id: &'a str,
    ) -> BoxFuture<'a, Result<TransactionResult<AnalysisResponse>, BedrockError>>;
}

pub struct BedrockAnalysisClient {
    client: aws_sdk_bedrockruntime::Client,
}

impl BedrockAnalysisClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_bedrockruntime::Client::new(config),
        }
    }

    pub fn from_client(client: aws_sdk_bedrockruntime::Client) -> Self {
        Self { client }
    }

    async fn converse(
        &self,
        prompt: &AnalysisPrompt,
        model_id: &str,
    ) -> Result<TransactionResult<AnalysisResponse>, BedrockError> {
        let image_block = ImageBlock::builder()
            .format(image_format(prompt.media_type))
            .source(ImageSource::Bytes(aws_smithy_types::Blob::new(
                prompt.image.clone(),
            )))
            .build()
            .map_err(|e| BedrockError::InvalidImage(e.to_string()))?;

        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Image(image_block))
            .content(ContentBlock::Text(prompt.user_text.clone()))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        info!(
            model_id,
            image_bytes = prompt.image.len(),
            media_type = %prompt.media_type,
            "sending analysis request"
        );

        let response = self
            .client
            .converse()
            .model_id(model_id)
            .system(SystemContentBlock::Text(prompt.system.clone()))
            .messages(message)
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(BedrockError::EmptyResponse);
        }

        let token_count = response
            .usage()
            .map(tokens::extract_token_count)
            .unwrap_or_default();
        let usage = tokens::usage_for(model_id, token_count);

        let citations = extract_link_citations(&text);
        let result = TransactionResult::new(
            model_id,
            usage,
            AnalysisResponse::new(text).with_citations(citations),
        );

        info!(
            transaction_id = %result.id,
            model_id,
            input_tokens = usage.tokens.input,
            output_tokens = usage.tokens.output,
            cost_usd = usage.cost_usd,
            response_len = result.output.text.len(),
            "analysis response received"
        );

        Ok(result)
    }
}

impl AnalysisClient for BedrockAnalysisClient {
    fn analyze<'a>(
        &'a self,
        prompt: &'a AnalysisPrompt,
        model_id: &'a str,
    ) -> BoxFuture<'a, Result<TransactionResult<AnalysisResponse>, BedrockError>> {
        Box::pin(self.converse(prompt, model_id))
    }
}

pub fn image_format(media_type: ImageMediaType) -> ImageFormat {
    match media_type {
        ImageMediaType::Jpeg => ImageFormat::Jpeg,
        ImageMediaType::Png => ImageFormat::Png,
        ImageMediaType::Webp => ImageFormat::Webp,
        ImageMediaType::Gif => ImageFormat::Gif,
    }
}
