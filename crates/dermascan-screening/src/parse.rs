//! Structured block extraction.
//!
//! The model's reply is free text with one embedded block:
//!
//! ```text
//! ~ABCDE_START~
//! Confidence Score: 82%
//! ISIC Risk Score: 6
//! A: Suspicious - uneven halves
//! Moles: Benign - uniform spots
//! ~ABCDE_END~
//! ## Report
//! ...
//! ```
//!
//! The block is cut out of the text and walked line by line. Every line goes
//! to exactly one handler: metric labels are tried first, then criterion
//! lines. Anything unreadable leaves the affected field at its sentinel, so
//! one bad line never spoils the rest of the parse.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use dermascan_core::block::{END_MARKER, LABEL_ALIASES, MetricField, START_MARKER};
use dermascan_core::models::finding::{FindingCode, FindingStatus, ParsedFinding};
use dermascan_core::models::metrics::{Metric, ParsedMetrics, RiskTier, ScoreBounds};

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is){}(.*?){}",
        regex::escape(START_MARKER),
        regex::escape(END_MARKER)
    ))
    .expect("valid block regex")
});

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-•]\s+|\*\s+|\d+[.)]\s+)").expect("valid bullet regex"));

static CRITERION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\*\*|__|\*|_)?\s*(moles|[a-e])\s*(?:\*\*|__|\*|_)?\s*[:.\-]\s*(?:\*\*|__|\*|_)?(.*)$")
        .expect("valid criterion regex")
});

static BRACKETED_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\[(]\s*(?i-u:suspicious|benign|unknown)\s*[\])]")
        .expect("valid bracketed status regex")
});

static LEADING_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\*\*|__|\*|_)?(?i-u:suspicious|benign|unknown)\b(?:\*\*|__|\*|_)?\s*(?:[:\-–—.,;]\s*)?")
        .expect("valid leading status regex")
});

/// Class values that mean the model gave no prediction.
const EMPTY_CLASS_VALUES: &[&str] = &["n/a", "na", "none", "unknown", "-"];

/// Result of parsing one model reply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedResponse {
    /// Criterion findings in block order.
    pub findings: Vec<ParsedFinding>,
    pub metrics: ParsedMetrics,
    /// The reply with the structured block removed.
    pub report_body: String,
    /// Whether a delimited block was found at all.
    pub block_found: bool,
}

/// Parse a complete model reply. Never fails.
pub fn parse_response(text: &str) -> ParsedResponse {
    let Some((span, content)) = locate_block(text) else {
        debug!(text_len = text.len(), "no structured block in response");
        return ParsedResponse {
            report_body: text.trim().to_string(),
            ..ParsedResponse::default()
        };
    };

    let (findings, metrics) = parse_block(content);

    ParsedResponse {
        findings,
        metrics,
        report_body: join_around(&text[..span.start], &text[span.end..]),
        block_found: true,
    }
}

/// Byte span of the first marker-delimited block (markers included) and its
/// inner content.
fn locate_block(text: &str) -> Option<(Range<usize>, &str)> {
    let captures = BLOCK_RE.captures(text)?;
    let whole = captures.get(0)?;
    let content = captures.get(1).map_or("", |m| m.as_str());
    Some((whole.range(), content))
}

/// Parse the inner content of a structured block (markers excluded).
pub fn parse_block(content: &str) -> (Vec<ParsedFinding>, ParsedMetrics) {
    let mut findings = Vec::new();
    let mut metrics = ParsedMetrics::default();

    for raw_line in content.lines() {
        let line = BULLET_RE.replace(raw_line, "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((field, value)) = match_metric_label(line) {
            apply_metric(&mut metrics, field, value);
            continue;
        }

        match parse_criterion_line(line) {
            Some(finding) => findings.push(finding),
            None => debug!(line, "skipping unrecognized block line"),
        }
    }

    (findings, metrics)
}

fn join_around(before: &str, after: &str) -> String {
    let before = before.trim();
    let after = after.trim();
    match (before.is_empty(), after.is_empty()) {
        (true, _) => after.to_string(),
        (_, true) => before.to_string(),
        _ => format!("{before}\n\n{after}"),
    }
}

// ── Metric lines ─────────────────────────────────────────────────────────────

/// Match a line against the known label prefixes.
///
/// Returns the metric and the raw value text: everything after the first `:`
/// following the label, or, when there is no colon, the rest of the line with
/// leading separators removed.
fn match_metric_label(line: &str) -> Option<(MetricField, &str)> {
    let start = line.len() - line.trim_start_matches(['*', '_']).len();
    let body = &line[start..];
    let lower = body.to_ascii_lowercase();

    let (alias, field) = LABEL_ALIASES.iter().find(|(alias, _)| {
        lower.starts_with(alias)
            && !lower[alias.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric())
    })?;

    let rest = &body[alias.len()..];
    let value = match rest.find(':') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| {
            c.is_whitespace() || matches!(c, '*' | '_' | '-' | '=')
        }),
    };
    Some((*field, value))
}

fn apply_metric(metrics: &mut ParsedMetrics, field: MetricField, value: &str) {
    match field {
        MetricField::Confidence => {
            set_first(&mut metrics.confidence, parse_score(value, ScoreBounds::PERCENT))
        }
        MetricField::IsicRisk => {
            set_first(&mut metrics.isic_risk, parse_score(value, ScoreBounds::ISIC))
        }
        MetricField::SevenPoint => set_first(
            &mut metrics.seven_point,
            parse_score(value, ScoreBounds::SEVEN_POINT),
        ),
        MetricField::RiskTier => set_first(&mut metrics.risk_tier, parse_risk_tier(value)),
        MetricField::PredictedClass => {
            set_first(&mut metrics.predicted_class, parse_class_name(value))
        }
        MetricField::ClassConfidence => set_first(
            &mut metrics.class_confidence,
            parse_score(value, ScoreBounds::PERCENT),
        ),
        MetricField::Features => set_first(&mut metrics.features, parse_feature_list(value)),
    }
}

/// The first successfully parsed occurrence of a metric wins.
fn set_first<T>(slot: &mut Metric<T>, parsed: Option<T>) {
    if slot.is_present() {
        return;
    }
    if let Some(value) = parsed {
        *slot = Metric::Present(value);
    }
}

/// First run of ASCII digits in `value`, clamped into `bounds`.
///
/// Overlong digit runs saturate instead of failing, so `"99999999999999999999%"`
/// still clamps to the upper bound.
pub fn parse_score(value: &str, bounds: ScoreBounds) -> Option<u8> {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    let raw = digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });
    Some(bounds.clamp(raw))
}

/// Qualitative tier. Checked from highest to lowest so mixed wording such as
/// "low to high" resolves upward.
pub fn parse_risk_tier(value: &str) -> Option<RiskTier> {
    let lower = value.to_lowercase();
    if lower.contains("high") {
        Some(RiskTier::High)
    } else if lower.contains("medium") || lower.contains("moderate") {
        Some(RiskTier::Medium)
    } else if lower.contains("low") {
        Some(RiskTier::Low)
    } else {
        None
    }
}

fn parse_class_name(value: &str) -> Option<String> {
    let name = trim_emphasis(value);
    if name.is_empty() || EMPTY_CLASS_VALUES.contains(&name.to_lowercase().as_str()) {
        return None;
    }
    Some(name.to_string())
}

/// Comma-separated tags, trimmed, empties dropped, order preserved.
pub fn parse_feature_list(value: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = value
        .split(',')
        .map(trim_emphasis)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    let only_placeholder = tags.len() == 1 && EMPTY_CLASS_VALUES.contains(&tags[0].to_lowercase().as_str());
    if tags.is_empty() || only_placeholder {
        None
    } else {
        Some(tags)
    }
}

fn trim_emphasis(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '_')
}

// ── Criterion lines ──────────────────────────────────────────────────────────

/// Parse a `<code><sep><content>` line. Unknown codes yield `None`.
pub fn parse_criterion_line(line: &str) -> Option<ParsedFinding> {
    let captures = CRITERION_RE.captures(line)?;
    let code = FindingCode::from_token(captures.get(1)?.as_str())?;
    let content = captures.get(2).map_or("", |m| m.as_str());

    let status = classify_status(content);
    let summary = derive_summary(content, status);

    Some(ParsedFinding::new(code, status, summary))
}

/// "suspicious" anywhere wins over "benign"; neither means Unknown.
///
/// Case folding is ASCII-only, matching the status patterns used by
/// [`derive_summary`].
pub fn classify_status(content: &str) -> FindingStatus {
    let lower = content.to_ascii_lowercase();
    if lower.contains("suspicious") {
        FindingStatus::Suspicious
    } else if lower.contains("benign") {
        FindingStatus::Benign
    } else {
        FindingStatus::Unknown
    }
}

/// Strip status tokens from the content to leave the descriptive summary.
///
/// An empty remainder falls back to the status word, or for Unknown to the
/// raw content itself.
pub fn derive_summary(content: &str, status: FindingStatus) -> String {
    let mut rest = BRACKETED_STATUS_RE.replace_all(content, " ").into_owned();
    while let Some(m) = LEADING_STATUS_RE.find(&rest) {
        if m.end() == 0 {
            break;
        }
        rest = rest[m.end()..].to_string();
    }

    let summary = trim_emphasis(&rest)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if !summary.is_empty() {
        return summary;
    }

    match status {
        FindingStatus::Unknown => trim_emphasis(content).to_string(),
        other => other.as_str().to_string(),
    }
}
