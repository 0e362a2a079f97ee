//! Composite "needs attention" flag.
//!
//! This is an OR of three independent checks, not a scoring model:
//!
//! 1. any finding is Suspicious,
//! 2. the parsed risk tier is High,
//! 3. the report body mentions an alarm phrase.
//!
//! The flag leans toward firing: a report that says
//! "no signs of melanoma" still trips the phrase check; the flag only drives
//! UI emphasis and never suppresses information.

use serde::{Deserialize, Serialize};

use dermascan_core::models::finding::{FindingCode, FindingStatus, ParsedFinding};
use dermascan_core::models::metrics::{Metric, ParsedMetrics, RiskTier};

/// Phrases that flag a report on their own, matched case-insensitively.
pub const ALARM_PHRASES: &[&str] = &[
    "melanoma",
    "carcinoma",
    "malignan",
    "consult a doctor",
    "consult a dermatologist",
    "see a dermatologist",
    "seek medical attention",
    "biopsy",
];

/// Why an assessment was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttentionReason {
    SuspiciousFinding { code: FindingCode },
    HighRiskTier,
    AlarmPhrase { phrase: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub needs_attention: bool,
    /// Parsed tier, else one derived from the ISIC score, else `None`.
    pub tier: Option<RiskTier>,
    /// Every clause that fired, in check order.
    pub reasons: Vec<AttentionReason>,
}

pub fn assess(
    findings: &[ParsedFinding],
    metrics: &ParsedMetrics,
    report_body: &str,
) -> RiskAssessment {
    let mut reasons: Vec<AttentionReason> = findings
        .iter()
        .filter(|f| f.status == FindingStatus::Suspicious)
        .map(|f| AttentionReason::SuspiciousFinding { code: f.code })
        .collect();

    if metrics.risk_tier == Metric::Present(RiskTier::High) {
        reasons.push(AttentionReason::HighRiskTier);
    }

    let body = report_body.to_lowercase();
    reasons.extend(
        ALARM_PHRASES
            .iter()
            .filter(|phrase| body.contains(*phrase))
            .map(|phrase| AttentionReason::AlarmPhrase {
                phrase: (*phrase).to_string(),
            }),
    );

    RiskAssessment {
        needs_attention: !reasons.is_empty(),
        tier: metrics
            .risk_tier
            .value()
            .copied()
            .or_else(|| metrics.isic_risk.value().copied().map(tier_from_isic)),
        reasons,
    }
}

/// 1–3 Low, 4–6 Medium, 7–10 High.
pub fn tier_from_isic(score: u8) -> RiskTier {
    match score {
        0..=3 => RiskTier::Low,
        4..=6 => RiskTier::Medium,
        _ => RiskTier::High,
    }
}
