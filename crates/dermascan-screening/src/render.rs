//! Write parsed fields back out in the structured block format.
//!
//! Used when a result is rebuilt from stored fields (history re-export,
//! share links from cached metrics). Output always reparses to the same
//! findings and metrics.

use std::fmt::Write;

use dermascan_core::block::{END_MARKER, MetricField, START_MARKER};
use dermascan_core::models::finding::{FindingStatus, ParsedFinding};
use dermascan_core::models::metrics::{Metric, ParsedMetrics};

pub fn render_block(findings: &[ParsedFinding], metrics: &ParsedMetrics) -> String {
    let mut out = String::new();
    out.push_str(START_MARKER);
    out.push('\n');

    if let Metric::Present(v) = metrics.confidence {
        metric_line(&mut out, MetricField::Confidence, format_args!("{v}%"));
    }
    if let Metric::Present(v) = metrics.isic_risk {
        metric_line(&mut out, MetricField::IsicRisk, format_args!("{v}"));
    }
    if let Metric::Present(v) = metrics.seven_point {
        metric_line(&mut out, MetricField::SevenPoint, format_args!("{v}"));
    }
    if let Metric::Present(tier) = metrics.risk_tier {
        metric_line(&mut out, MetricField::RiskTier, format_args!("{tier}"));
    }
    if let Metric::Present(name) = &metrics.predicted_class {
        metric_line(&mut out, MetricField::PredictedClass, format_args!("{name}"));
    }
    if let Metric::Present(v) = metrics.class_confidence {
        metric_line(&mut out, MetricField::ClassConfidence, format_args!("{v}%"));
    }
    if let Metric::Present(tags) = &metrics.features {
        let joined = tags.join(", ");
        metric_line(&mut out, MetricField::Features, format_args!("{joined}"));
    }

    for finding in findings {
        let token = finding.code.line_token();
        // Infallible: writing into a String.
        let _ = match finding.status {
            FindingStatus::Unknown => writeln!(out, "{token}: {}", finding.summary),
            status => writeln!(out, "{token}: {status} - {}", finding.summary),
        };
    }

    out.push_str(END_MARKER);
    out
}

fn metric_line(out: &mut String, field: MetricField, value: std::fmt::Arguments<'_>) {
    let _ = writeln!(out, "{}: {value}", field.canonical_label());
}
