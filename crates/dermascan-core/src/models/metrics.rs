use std::fmt;

use serde::{Deserialize, Serialize};

/// A metric that was either extracted from the structured block or is
/// missing/unreadable.
///
/// Kept distinct from `Option` in the serialized form so that consumers never
/// read an absent score as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Metric<T> {
    Present(T),
    NotAvailable,
}

impl<T> Default for Metric<T> {
    fn default() -> Self {
        Self::NotAvailable
    }
}

impl<T> Metric<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            Self::NotAvailable => None,
        }
    }
}

/// Sentinel text shown for a metric that is not available.
pub const NOT_AVAILABLE: &str = "N/A";

/// Inclusive bounds for an integer score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBounds {
    pub min: u8,
    pub max: u8,
}

impl ScoreBounds {
    pub const PERCENT: ScoreBounds = ScoreBounds { min: 0, max: 100 };
    pub const ISIC: ScoreBounds = ScoreBounds { min: 1, max: 10 };
    pub const SEVEN_POINT: ScoreBounds = ScoreBounds { min: 0, max: 10 };

    /// Clamp a raw reading into range. Out-of-range values are pulled to the
    /// nearest bound rather than discarded.
    pub fn clamp(&self, raw: u64) -> u8 {
        raw.clamp(self.min as u64, self.max as u64) as u8
    }

    /// Position of `value` within the range as a 0–1 fraction.
    pub fn fraction(&self, value: u8) -> f64 {
        let span = (self.max - self.min) as f64;
        if span == 0.0 {
            return 1.0;
        }
        (value.saturating_sub(self.min)) as f64 / span
    }
}

/// Qualitative risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar and categorical fields extracted from the structured block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedMetrics {
    /// Overall model confidence, percent (0–100).
    pub confidence: Metric<u8>,
    /// ISIC-style risk scale (1–10).
    pub isic_risk: Metric<u8>,
    /// Glasgow weighted 7-point checklist score (0–10).
    pub seven_point: Metric<u8>,
    pub risk_tier: Metric<RiskTier>,
    /// HAM10000 category name.
    pub predicted_class: Metric<String>,
    /// Confidence attached to `predicted_class`, percent (0–100).
    pub class_confidence: Metric<u8>,
    /// Dermoscopic feature tags in the order the model listed them.
    pub features: Metric<Vec<String>>,
}

impl ParsedMetrics {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        !(self.confidence.is_present()
            || self.isic_risk.is_present()
            || self.seven_point.is_present()
            || self.risk_tier.is_present()
            || self.predicted_class.is_present()
            || self.class_confidence.is_present()
            || self.features.is_present())
    }

    pub fn confidence_display(&self) -> String {
        percent_display(&self.confidence)
    }

    pub fn class_confidence_display(&self) -> String {
        percent_display(&self.class_confidence)
    }
}

fn percent_display(metric: &Metric<u8>) -> String {
    match metric {
        Metric::Present(v) => format!("{v}%"),
        Metric::NotAvailable => NOT_AVAILABLE.to_string(),
    }
}
