//! Structured block vocabulary.
//!
//! The model is instructed to emit a machine-readable block delimited by
//! [`START_MARKER`] and [`END_MARKER`], one `Label: value` or
//! `<code>: <status> - <summary>` line per entry. The prompt builder, the
//! parser and the block re-serializer all draw their wording from here so the
//! three never drift apart.

pub const START_MARKER: &str = "~ABCDE_START~";

pub const END_MARKER: &str = "~ABCDE_END~";

/// Canonical metric labels, as requested from the model and as written back
/// by the re-serializer.
pub mod label {
    pub const CONFIDENCE: &str = "Confidence Score";
    pub const ISIC_RISK: &str = "ISIC Risk Score";
    pub const SEVEN_POINT: &str = "7-Point Score";
    pub const RISK_TIER: &str = "Risk Level";
    pub const PREDICTED_CLASS: &str = "HAM10000 Class";
    pub const CLASS_CONFIDENCE: &str = "Class Confidence";
    pub const FEATURES: &str = "Dermoscopic Features";
}

/// Which metric a label line feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    Confidence,
    IsicRisk,
    SevenPoint,
    RiskTier,
    PredictedClass,
    ClassConfidence,
    Features,
}

impl MetricField {
    pub fn canonical_label(self) -> &'static str {
        match self {
            Self::Confidence => label::CONFIDENCE,
            Self::IsicRisk => label::ISIC_RISK,
            Self::SevenPoint => label::SEVEN_POINT,
            Self::RiskTier => label::RISK_TIER,
            Self::PredictedClass => label::PREDICTED_CLASS,
            Self::ClassConfidence => label::CLASS_CONFIDENCE,
            Self::Features => label::FEATURES,
        }
    }
}

/// Recognized label prefixes, lowercase, most specific first.
///
/// A line is matched against these in order, so `"ham10000 confidence"` must
/// come before `"ham10000"`, `"class confidence"` before `"confidence"` and
/// `"classification confidence"` before `"classification"`.
pub const LABEL_ALIASES: &[(&str, MetricField)] = &[
    ("ham10000 confidence", MetricField::ClassConfidence),
    ("class confidence", MetricField::ClassConfidence),
    ("prediction confidence", MetricField::ClassConfidence),
    ("ham10000 classification confidence", MetricField::ClassConfidence),
    ("classification confidence", MetricField::ClassConfidence),
    ("ham10000 classification", MetricField::PredictedClass),
    ("classification", MetricField::PredictedClass),
    ("ham10000 class", MetricField::PredictedClass),
    ("ham10000 prediction", MetricField::PredictedClass),
    ("predicted class", MetricField::PredictedClass),
    ("confidence score", MetricField::Confidence),
    ("confidence", MetricField::Confidence),
    ("isic risk score", MetricField::IsicRisk),
    ("isic score", MetricField::IsicRisk),
    ("isic risk", MetricField::IsicRisk),
    ("glasgow 7-point score", MetricField::SevenPoint),
    ("glasgow 7-point", MetricField::SevenPoint),
    ("glasgow score", MetricField::SevenPoint),
    ("7-point score", MetricField::SevenPoint),
    ("7-point checklist", MetricField::SevenPoint),
    ("seven-point score", MetricField::SevenPoint),
    ("risk level", MetricField::RiskTier),
    ("risk tier", MetricField::RiskTier),
    ("overall risk", MetricField::RiskTier),
    ("dermoscopic features", MetricField::Features),
    ("features", MetricField::Features),
];

/// Keyword that introduces the general moles criterion line.
pub const MOLES_KEYWORD: &str = "Moles";
