use dermascan_core::models::response::Citation;
use dermascan_export::docx::generate_docx;
use dermascan_export::markdown::{Block, PAGE_BREAK, Span, parse_blocks, parse_inline};
use dermascan_export::pdf::{generate_pdf, text_width, wrap_spans};
use dermascan_export::render::{DISCLAIMER, ExportDocument, render_markdown, render_with_template};
use dermascan_export::styles::DocumentStyles;
use dermascan_screening::{assess, parse_response};

const REPLY: &str = "~ABCDE_START~
Confidence Score: 82%
ISIC Risk Score: 6
Risk Level: Medium
A: Suspicious - uneven halves
B: Benign - smooth border
~ABCDE_END~
## Summary
The lesion is mostly regular.";

fn document() -> ExportDocument {
    let parsed = parse_response(REPLY);
    let assessment = assess(&parsed.findings, &parsed.metrics, &parsed.report_body);
    let citations = vec![Citation {
        uri: "https://www.isic-archive.com".to_string(),
        title: "ISIC Archive".to_string(),
    }];
    ExportDocument::new(
        &parsed,
        &assessment,
        &citations,
        jiff::Timestamp::from_second(1_760_000_000).expect("timestamp"),
    )
    .with_notes(Some("Noticed it last month.".to_string()))
}

#[test]
fn markdown_report_contains_every_section() {
    let markdown = render_markdown(&document()).expect("render");

    assert!(markdown.starts_with("# Skin Lesion Screening Report"));
    assert!(markdown.contains("Generated: 2025-10-09"));
    assert!(markdown.contains("**Attention:**"));
    assert!(markdown.contains("**Overall risk:** Medium"));
    assert!(markdown.contains("- **Confidence Score:** 82%"));
    assert!(markdown.contains("- **ISIC Risk Score:** 6/10"));
    assert!(markdown.contains("- **7-Point Score:** N/A"));
    assert!(markdown.contains("- **A Asymmetry:** Suspicious - uneven halves"));
    assert!(markdown.contains("- **B Border:** Benign - smooth border"));
    assert!(markdown.contains("## Your Notes\n\nNoticed it last month."));
    assert!(markdown.contains("The lesion is mostly regular."));
    assert!(markdown.contains("- ISIC Archive (https://www.isic-archive.com)"));
    assert!(markdown.trim_end().ends_with(DISCLAIMER));
    assert!(!markdown.contains("ABCDE_START"));
}

#[test]
fn custom_template_sees_the_same_context() {
    let rendered = render_with_template(
        "brief.md",
        "{{ confidence }} / {% for f in findings %}{{ f.code }}={{ f.status }} {% endfor %}",
        &document(),
    )
    .expect("render");
    assert_eq!(rendered, "82% / A=Suspicious B=Benign ");
}

#[test]
fn broken_template_is_a_parse_error() {
    let err = render_with_template("bad.md", "{% if %}", &document()).expect_err("bad template");
    assert!(matches!(err, dermascan_export::error::ExportError::TemplateParse(_)));
}

#[test]
fn markdown_subset_is_recognized() {
    let blocks = parse_blocks(
        "# Title\n\n- **A:** Benign\nplain **bold** text\n---\n<!-- pagebreak -->\n#nospace",
    );
    assert_eq!(
        blocks,
        vec![
            Block::Heading {
                level: 1,
                text: "Title".to_string()
            },
            Block::Blank,
            Block::Bullet(vec![
                Span {
                    text: "A:".to_string(),
                    bold: true
                },
                Span {
                    text: " Benign".to_string(),
                    bold: false
                },
            ]),
            Block::Paragraph(parse_inline("plain **bold** text")),
            Block::Rule,
            Block::PageBreak,
            Block::Paragraph(parse_inline("#nospace")),
        ]
    );
    assert_eq!(
        parse_inline("unclosed **bold"),
        vec![Span {
            text: "unclosed **bold".to_string(),
            bold: false
        }]
    );
}

#[test]
fn wrapping_respects_the_column_width() {
    let spans = parse_inline(&"word ".repeat(200));
    let lines = wrap_spans(&spans, 11.0, 100.0);
    assert!(lines.len() > 1);
    let words: usize = lines
        .iter()
        .flatten()
        .map(|s| s.text.split_whitespace().count())
        .sum();
    assert_eq!(words, 200);
}

#[test]
fn overlong_words_are_split_to_fit() {
    let url = format!("https://example.org/{}", "a".repeat(300));
    let spans = parse_inline(&format!("- see {url} today"));
    let lines = wrap_spans(&spans, 11.0, 60.0);

    assert!(lines.len() > 2);
    for line in &lines {
        let width: f32 = line.iter().map(|s| text_width(&s.text, 11.0, s.bold)).sum();
        assert!(width <= 60.001, "line too wide: {width}");
    }
    let rejoined: String = lines.iter().flatten().map(|s| s.text.as_str()).collect();
    assert!(rejoined.contains(&url));
}

#[test]
fn disclaimer_separator_is_a_rule_not_a_page_break() {
    let markdown = render_markdown(&document()).expect("render");
    let blocks = parse_blocks(&markdown);
    assert!(blocks.contains(&Block::Rule));
    assert!(!blocks.contains(&Block::PageBreak));

    let body_rule = parse_blocks(&format!("Intro\n***\nMore\n{PAGE_BREAK}\nLast"));
    assert_eq!(
        body_rule.iter().filter(|b| **b == Block::PageBreak).count(),
        1
    );
    assert_eq!(body_rule.iter().filter(|b| **b == Block::Rule).count(), 1);
}

#[test]
fn pdf_output_is_a_pdf_and_long_reports_paginate() {
    let styles = DocumentStyles::default();
    let markdown = render_markdown(&document()).expect("render");

    let short = generate_pdf(&markdown, "Report", &styles).expect("pdf");
    assert!(short.starts_with(b"%PDF"));

    let long_body = "A long paragraph about pigment network and border irregularity. ".repeat(400);
    let long = generate_pdf(&format!("{markdown}\n{long_body}"), "Report", &styles).expect("pdf");
    assert!(long.starts_with(b"%PDF"));
    assert!(long.len() > short.len());
}

#[test]
fn docx_output_is_a_zip_package() {
    let markdown = render_markdown(&document()).expect("render");
    let bytes = generate_docx(&markdown, &DocumentStyles::default()).expect("docx");
    assert!(bytes.starts_with(b"PK"));
}
