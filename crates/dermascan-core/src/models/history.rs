use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

use super::metrics::ParsedMetrics;
use super::request::ImageMediaType;
use super::response::AnalysisResponse;
use super::token_count::TokenUsage;

/// The analyzed image, stored inline as base64 so a record is self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub media_type: ImageMediaType,
    pub data_base64: String,
}

impl ImageRef {
    pub fn from_bytes(media_type: ImageMediaType, bytes: &[u8]) -> Self {
        Self {
            media_type,
            data_base64: STANDARD.encode(bytes),
        }
    }

    pub fn bytes(&self) -> Result<Vec<u8>, CoreError> {
        STANDARD
            .decode(&self.data_base64)
            .map_err(|e| CoreError::InvalidImage(e.to_string()))
    }

    /// `data:` URL form, for hosts that render the image directly.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type.mime(), self.data_base64)
    }
}

/// A completed analysis kept in local history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub timestamp: jiff::Timestamp,
    pub image: ImageRef,
    pub response: AnalysisResponse,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub lesion_id: Option<Uuid>,
    /// Parsed metrics cached at save time so history views need not reparse.
    #[serde(default)]
    pub metrics: Option<ParsedMetrics>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl HistoryRecord {
    pub fn new(image: ImageRef, response: AnalysisResponse) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: jiff::Timestamp::now(),
            image,
            response,
            notes: None,
            lesion_id: None,
            metrics: None,
            model_id: None,
            usage: None,
        }
    }
}
