//! View model for a screening result.
//!
//! Pure function of the parsed state: no business decisions are made here
//! beyond choosing what to emphasize.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use dermascan_core::block::MetricField;
use dermascan_core::models::finding::{FindingStatus, ParsedFinding};
use dermascan_core::models::metrics::{Metric, NOT_AVAILABLE, ParsedMetrics, RiskTier, ScoreBounds};
use dermascan_core::models::response::Citation;

use crate::glossary;
use crate::parse::ParsedResponse;
use crate::risk::RiskAssessment;

/// ISIC score from which the card is emphasized.
const ISIC_EMPHASIS_FROM: u8 = 7;
/// Glasgow score from which referral is conventionally advised.
const SEVEN_POINT_EMPHASIS_FROM: u8 = 3;

const ATTENTION_BANNER: &str =
    "This result has features that deserve a closer look. Please consider seeing a dermatologist.";

static TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut terms: Vec<&str> = glossary::TERMS.iter().map(|(t, _)| *t).collect();
    terms.sort_by_key(|t| std::cmp::Reverse(t.len()));
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid glossary regex")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub label: String,
    pub display: String,
    /// Gauge fill in `0.0..=1.0` for numeric metrics.
    pub fill: Option<f64>,
    pub emphasis: bool,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingCard {
    pub code: String,
    pub title: String,
    pub status: FindingStatus,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    Term { text: String, definition: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub attention_banner: Option<String>,
    pub tier: Option<RiskTier>,
    pub scorecards: Vec<Scorecard>,
    pub findings: Vec<FindingCard>,
    pub body: Vec<Segment>,
    pub citations: Vec<Citation>,
}

pub fn present(
    parsed: &ParsedResponse,
    assessment: &RiskAssessment,
    citations: &[Citation],
) -> ReportView {
    ReportView {
        attention_banner: assessment
            .needs_attention
            .then(|| ATTENTION_BANNER.to_string()),
        tier: assessment.tier,
        scorecards: scorecards(&parsed.metrics),
        findings: parsed.findings.iter().map(finding_card).collect(),
        body: annotate(&parsed.report_body),
        citations: citations.to_vec(),
    }
}

pub fn scorecards(metrics: &ParsedMetrics) -> Vec<Scorecard> {
    vec![
        score_card(MetricField::Confidence, &metrics.confidence, ScoreBounds::PERCENT, "%", None),
        score_card(
            MetricField::IsicRisk,
            &metrics.isic_risk,
            ScoreBounds::ISIC,
            "/10",
            Some(ISIC_EMPHASIS_FROM),
        ),
        score_card(
            MetricField::SevenPoint,
            &metrics.seven_point,
            ScoreBounds::SEVEN_POINT,
            "/10",
            Some(SEVEN_POINT_EMPHASIS_FROM),
        ),
        match metrics.risk_tier {
            Metric::Present(tier) => Scorecard {
                label: MetricField::RiskTier.canonical_label().to_string(),
                display: tier.to_string(),
                fill: Some(match tier {
                    RiskTier::Low => 1.0 / 3.0,
                    RiskTier::Medium => 2.0 / 3.0,
                    RiskTier::High => 1.0,
                }),
                emphasis: tier == RiskTier::High,
                available: true,
            },
            Metric::NotAvailable => unavailable(MetricField::RiskTier),
        },
        match &metrics.predicted_class {
            Metric::Present(name) => {
                let lower = name.to_lowercase();
                Scorecard {
                    label: MetricField::PredictedClass.canonical_label().to_string(),
                    display: match metrics.class_confidence {
                        Metric::Present(c) => format!("{name} ({c}%)"),
                        Metric::NotAvailable => name.clone(),
                    },
                    fill: metrics
                        .class_confidence
                        .value()
                        .map(|c| ScoreBounds::PERCENT.fraction(*c)),
                    emphasis: lower.contains("melanoma") || lower.contains("carcinoma"),
                    available: true,
                }
            }
            Metric::NotAvailable => unavailable(MetricField::PredictedClass),
        },
        match &metrics.features {
            Metric::Present(tags) => Scorecard {
                label: MetricField::Features.canonical_label().to_string(),
                display: tags.join(", "),
                fill: None,
                emphasis: false,
                available: true,
            },
            Metric::NotAvailable => unavailable(MetricField::Features),
        },
    ]
}

fn score_card(
    field: MetricField,
    metric: &Metric<u8>,
    bounds: ScoreBounds,
    suffix: &str,
    emphasis_from: Option<u8>,
) -> Scorecard {
    match metric {
        Metric::Present(v) => Scorecard {
            label: field.canonical_label().to_string(),
            display: format!("{v}{suffix}"),
            fill: Some(bounds.fraction(*v)),
            emphasis: emphasis_from.is_some_and(|from| *v >= from),
            available: true,
        },
        Metric::NotAvailable => unavailable(field),
    }
}

fn unavailable(field: MetricField) -> Scorecard {
    Scorecard {
        label: field.canonical_label().to_string(),
        display: NOT_AVAILABLE.to_string(),
        fill: None,
        emphasis: false,
        available: false,
    }
}

fn finding_card(finding: &ParsedFinding) -> FindingCard {
    FindingCard {
        code: finding.code.code().to_string(),
        title: finding.title.clone(),
        status: finding.status,
        summary: finding.summary.clone(),
    }
}

/// Split text into plain runs and glossary-term runs.
pub fn annotate(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for m in TERM_RE.find_iter(text) {
        let Some(definition) = glossary::define(m.as_str()) else {
            continue;
        };
        if m.start() > cursor {
            segments.push(Segment::Text {
                text: text[cursor..m.start()].to_string(),
            });
        }
        segments.push(Segment::Term {
            text: m.as_str().to_string(),
            definition: definition.to_string(),
        });
        cursor = m.end();
    }

    if cursor < text.len() {
        segments.push(Segment::Text {
            text: text[cursor..].to_string(),
        });
    }

    segments
}
