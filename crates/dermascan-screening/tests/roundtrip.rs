//! Re-serializing parsed fields and parsing again must be a fixed point.

use dermascan_core::models::finding::{FindingCode, FindingStatus, ParsedFinding};
use dermascan_core::models::metrics::{Metric, ParsedMetrics, RiskTier};
use dermascan_screening::{parse_response, render_block};
use proptest::prelude::*;

fn is_placeholder(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "n/a" | "na" | "none" | "unknown")
}

fn mentions_status(value: &str) -> bool {
    ["suspicious", "benign", "unknown"].iter().any(|w| value.contains(w))
}

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,10}"
}

fn phrase() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..6).prop_map(|w| w.join(" "))
}

fn status() -> impl Strategy<Value = FindingStatus> {
    prop_oneof![
        Just(FindingStatus::Benign),
        Just(FindingStatus::Suspicious),
        Just(FindingStatus::Unknown),
    ]
}

fn code() -> impl Strategy<Value = FindingCode> {
    prop::sample::select(FindingCode::ALL.to_vec())
}

/// A criterion line as a model might write it.
fn criterion_line() -> impl Strategy<Value = String> {
    (code(), status(), phrase(), prop::sample::select(vec![":", " -", "."])).prop_map(
        |(code, status, summary, sep)| match status {
            FindingStatus::Unknown => format!("{}{sep} {summary}", code.line_token()),
            s => format!("{}{sep} {s} - {summary}", code.line_token()),
        },
    )
}

fn metric<T: std::fmt::Debug + Clone + 'static>(
    inner: impl Strategy<Value = T> + 'static,
) -> impl Strategy<Value = Metric<T>> {
    prop_oneof![Just(Metric::NotAvailable), inner.prop_map(Metric::Present)]
}

fn metrics() -> impl Strategy<Value = ParsedMetrics> {
    (
        metric(0u8..=100),
        metric(1u8..=10),
        metric(0u8..=10),
        metric(prop_oneof![
            Just(RiskTier::Low),
            Just(RiskTier::Medium),
            Just(RiskTier::High)
        ]),
        metric("[A-Z][a-z]{2,12}( [a-z]{2,8})?".prop_filter("placeholder class", |c| !is_placeholder(c))),
        metric(0u8..=100),
        metric(
            prop::collection::vec("[a-z]{2,8}( [a-z]{2,8})?", 1..5)
                .prop_filter("placeholder list", |tags| !(tags.len() == 1 && is_placeholder(&tags[0]))),
        ),
    )
        .prop_map(
            |(confidence, isic_risk, seven_point, risk_tier, predicted_class, class_confidence, features)| {
                ParsedMetrics {
                    confidence,
                    isic_risk,
                    seven_point,
                    risk_tier,
                    predicted_class,
                    class_confidence,
                    features,
                }
            },
        )
}

proptest! {
    #[test]
    fn reparsing_rendered_block_is_stable(
        lines in prop::collection::vec(criterion_line(), 0..8),
        metrics in metrics(),
    ) {
        let first = render_block(&[], &metrics);
        let mut text = first.replace("~ABCDE_END~", "");
        for line in &lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str("~ABCDE_END~\nreport text");

        let parsed = parse_response(&text);
        let rendered = render_block(&parsed.findings, &parsed.metrics);
        let reparsed = parse_response(&rendered);

        prop_assert_eq!(&reparsed.findings, &parsed.findings);
        prop_assert_eq!(&reparsed.metrics, &parsed.metrics);
        prop_assert_eq!(&parsed.metrics, &metrics);
        prop_assert_eq!(parsed.findings.len(), lines.len());
    }

    #[test]
    fn rendered_findings_survive_unchanged(
        findings in prop::collection::vec(
            (
                code(),
                status(),
                "[a-z]{1,8}( [a-z]{1,8}){0,3}".prop_filter("status word", |s| !mentions_status(s)),
            )
                .prop_map(|(c, s, summary)| ParsedFinding::new(c, s, summary)),
            0..6,
        ),
    ) {
        let parsed = parse_response(&render_block(&findings, &ParsedMetrics::default()));
        prop_assert_eq!(parsed.findings, findings);
    }
}
