use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Image encodings the analysis service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMediaType {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageMediaType {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Map a file extension to a media type.
    ///
    /// Returns `None` for extensions that are not supported image formats.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

impl FromStr for ImageMediaType {
    type Err = CoreError;

    /// Parse a MIME tag such as `image/jpeg` (parameters are ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default().trim().to_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/webp" => Ok(Self::Webp),
            "image/gif" => Ok(Self::Gif),
            _ => Err(CoreError::UnsupportedMediaType(s.to_string())),
        }
    }
}

impl fmt::Display for ImageMediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// One user-initiated analysis. Built per action and discarded after send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub image: Vec<u8>,
    pub media_type: ImageMediaType,
    pub notes: Option<String>,
    pub model_id: String,
}

impl AnalysisRequest {
    pub fn new(
        image: Vec<u8>,
        media_type: ImageMediaType,
        notes: Option<String>,
        model_id: impl Into<String>,
    ) -> Result<Self, CoreError> {
        if image.is_empty() {
            return Err(CoreError::InvalidImage("image payload is empty".to_string()));
        }
        Ok(Self {
            image,
            media_type,
            notes,
            model_id: model_id.into(),
        })
    }

    /// Notes with surrounding whitespace removed; blank notes count as none.
    pub fn trimmed_notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}
