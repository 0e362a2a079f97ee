//! Markdown report rendering.
//!
//! An [`ExportDocument`] is the flat, template-friendly view of one result.
//! It is rendered with Tera; callers may supply their own template, which
//! sees the same context variables as the built-in one.

use serde::Serialize;
use tera::{Context, Tera};

use dermascan_core::models::response::Citation;
use dermascan_screening::present::scorecards;
use dermascan_screening::{ParsedResponse, RiskAssessment};

use crate::error::ExportError;

pub const DEFAULT_TEMPLATE_NAME: &str = "report.md";

pub const DEFAULT_TITLE: &str = "Skin Lesion Screening Report";

pub const DISCLAIMER: &str = "This report was produced by an AI model from a single photo. It is not a diagnosis and does not replace an examination by a qualified clinician. If you are worried about a skin lesion, see a dermatologist.";

const ATTENTION_MESSAGE: &str =
    "Some features in this result deserve a closer look by a dermatologist.";

pub const DEFAULT_TEMPLATE: &str = r#"# {{ title }}

Generated: {{ generated_at }}{% if model_id %} | Model: {{ model_id }}{% endif %}

{% if needs_attention %}**Attention:** {{ attention_message }}

{% endif %}{% if risk_tier %}**Overall risk:** {{ risk_tier }}

{% endif %}## Scores

{% for metric in metrics %}- **{{ metric.label }}:** {{ metric.display }}
{% endfor %}
{% if findings %}## ABCDE Findings

{% for finding in findings %}- **{{ finding.code }} {{ finding.title }}:** {{ finding.status }}{% if finding.summary %} - {{ finding.summary }}{% endif %}
{% endfor %}
{% endif %}{% if notes %}## Your Notes

{{ notes }}

{% endif %}{% if body %}## Report

{{ body }}

{% endif %}{% if citations %}## Sources

{% for citation in citations %}- {{ citation.title }} ({{ citation.uri }})
{% endfor %}
{% endif %}---

{{ disclaimer }}
"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportMetric {
    pub label: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportFinding {
    pub code: String,
    pub title: String,
    pub status: String,
    pub summary: String,
}

/// Everything a report template can reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub title: String,
    pub generated_at: String,
    pub model_id: Option<String>,
    pub confidence: String,
    pub metrics: Vec<ExportMetric>,
    pub risk_tier: Option<String>,
    pub needs_attention: bool,
    pub attention_message: String,
    pub findings: Vec<ExportFinding>,
    pub notes: Option<String>,
    pub body: String,
    pub citations: Vec<Citation>,
    pub disclaimer: String,
}

impl ExportDocument {
    pub fn new(
        parsed: &ParsedResponse,
        assessment: &RiskAssessment,
        citations: &[Citation],
        generated_at: jiff::Timestamp,
    ) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            generated_at: generated_at.strftime("%Y-%m-%d %H:%M UTC").to_string(),
            model_id: None,
            confidence: parsed.metrics.confidence_display(),
            metrics: scorecards(&parsed.metrics)
                .into_iter()
                .map(|card| ExportMetric {
                    label: card.label,
                    display: card.display,
                })
                .collect(),
            risk_tier: assessment.tier.map(|t| t.to_string()),
            needs_attention: assessment.needs_attention,
            attention_message: ATTENTION_MESSAGE.to_string(),
            findings: parsed
                .findings
                .iter()
                .map(|f| ExportFinding {
                    code: f.code.code().to_string(),
                    title: f.title.clone(),
                    status: f.status.to_string(),
                    summary: f.summary.clone(),
                })
                .collect(),
            notes: None,
            body: parsed.report_body.clone(),
            citations: citations.to_vec(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }
}

pub fn render_markdown(doc: &ExportDocument) -> Result<String, ExportError> {
    render_with_template(DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE, doc)
}

/// Render with a caller-supplied Tera template.
pub fn render_with_template(
    template_name: &str,
    template_content: &str,
    doc: &ExportDocument,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let context = Context::from_serialize(doc)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    Ok(tera.render(template_name, &context)?)
}
