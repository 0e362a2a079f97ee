use std::io::Cursor;

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts, Style, StyleType};
use tracing::debug;

use crate::error::ExportError;
use crate::markdown::{Block, Span, parse_blocks};
use crate::styles::DocumentStyles;

const RULE_TEXT: &str = "\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}";

const HEADING_STYLES: [(&str, &str); 3] = [
    ("Heading1", "heading 1"),
    ("Heading2", "heading 2"),
    ("Heading3", "heading 3"),
];

/// Build a DOCX from a Markdown report.
pub fn generate_docx(markdown: &str, styles: &DocumentStyles) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new();
    for (level, (style_id, name)) in (1u8..).zip(HEADING_STYLES) {
        docx = docx.add_style(
            Style::new(style_id, StyleType::Paragraph)
                .name(name)
                .size(styles.heading_size(level) * 2)
                .bold()
                .fonts(RunFonts::new().ascii(&styles.heading_font)),
        );
    }

    for block in parse_blocks(markdown) {
        let paragraph = match block {
            Block::Heading { level, text } => Paragraph::new()
                .style(HEADING_STYLES[usize::from(level.clamp(1, 3)) - 1].0)
                .add_run(Run::new().add_text(text)),
            Block::Bullet(spans) => runs(
                Paragraph::new()
                    .align(AlignmentType::Left)
                    .add_run(body_run("\u{2022} ", false, styles)),
                &spans,
                styles,
            ),
            Block::Paragraph(spans) => {
                runs(Paragraph::new().align(AlignmentType::Left), &spans, styles)
            }
            Block::Rule => Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(body_run(RULE_TEXT, false, styles)),
            Block::PageBreak => Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
            Block::Blank => Paragraph::new(),
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    let bytes = buf.into_inner();
    debug!(bytes = bytes.len(), "generated DOCX");
    Ok(bytes)
}

fn runs(paragraph: Paragraph, spans: &[Span], styles: &DocumentStyles) -> Paragraph {
    spans.iter().fold(paragraph, |p, span| {
        p.add_run(body_run(&span.text, span.bold, styles))
    })
}

fn body_run(text: &str, bold: bool, styles: &DocumentStyles) -> Run {
    let run = Run::new()
        .add_text(text)
        .size(styles.body_size * 2)
        .fonts(RunFonts::new().ascii(&styles.body_font));
    if bold { run.bold() } else { run }
}
