//! PDF output via `printpdf` builtin fonts.
//!
//! Builtin fonts carry no metrics, so line widths are estimated from an
//! average Helvetica glyph width. Lines are wrapped on words and a new A4
//! page is started whenever the next line would cross the bottom margin.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use tracing::debug;

use crate::error::ExportError;
use crate::markdown::{Block, Span, parse_blocks};
use crate::styles::DocumentStyles;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const LAYER_NAME: &str = "Layer 1";
const PT_TO_MM: f32 = 0.3528;
/// Average advance of a Helvetica glyph, as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const BOLD_GLYPH_WIDTH: f32 = 0.55;
const BULLET_INDENT: Mm = Mm(5.0);
const BULLET: &str = "-";
const RULE_THICKNESS_PT: f32 = 0.5;

/// Lay out a Markdown report on A4 pages.
pub fn generate_pdf(
    markdown: &str,
    title: &str,
    styles: &DocumentStyles,
) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, LAYER_NAME);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;

    let margin = Mm(styles.margin_mm());
    let mut writer = PageWriter {
        layer: doc.get_page(page).get_layer(layer),
        doc: &doc,
        y: PAGE_HEIGHT - margin,
        margin,
        regular,
        bold,
        styles,
        pages: 1,
    };

    for block in parse_blocks(markdown) {
        writer.block(&block);
    }
    let pages = writer.pages;

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))?;

    debug!(pages, bytes = bytes.len(), "generated PDF");
    Ok(bytes)
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
    margin: Mm,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    styles: &'a DocumentStyles,
    pages: usize,
}

impl PageWriter<'_> {
    fn block(&mut self, block: &Block) {
        let body = self.styles.body_size as f32;
        match block {
            Block::Heading { level, text } => {
                let size = self.styles.heading_size(*level) as f32;
                self.gap(size * 0.4);
                let spans = [Span {
                    text: text.clone(),
                    bold: true,
                }];
                self.wrapped(&spans, size, Mm(0.0));
                self.gap(size * 0.2);
            }
            Block::Bullet(spans) => {
                self.ensure_room(body);
                self.layer.use_text(
                    BULLET,
                    body,
                    self.margin + Mm(1.0),
                    self.y - line_height(body, self.styles),
                    &self.regular,
                );
                self.wrapped(spans, body, BULLET_INDENT);
            }
            Block::Paragraph(spans) => self.wrapped(spans, body, Mm(0.0)),
            Block::Rule => self.rule(body),
            Block::PageBreak => self.new_page(),
            Block::Blank => self.gap(body * 0.5),
        }
    }

    /// Word-wrap `spans` into the text column and draw them line by line.
    fn wrapped(&mut self, spans: &[Span], size: f32, indent: Mm) {
        let width = PAGE_WIDTH.0 - 2.0 * self.margin.0 - indent.0;
        for line in wrap_spans(spans, size, width) {
            self.ensure_room(size);
            self.y -= line_height(size, self.styles);
            let mut x = self.margin + indent;
            for span in &line {
                let font = if span.bold { &self.bold } else { &self.regular };
                self.layer
                    .use_text(pdf_safe(&span.text), size, x, self.y, font);
                x += Mm(text_width(&span.text, size, span.bold));
            }
        }
    }

    /// Thin horizontal line across the text column, centred in one line.
    fn rule(&mut self, size: f32) {
        self.ensure_room(size);
        let y = self.y - Mm(line_height(size, self.styles).0 / 2.0);
        self.layer.set_outline_thickness(RULE_THICKNESS_PT);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(self.margin, y), false),
                (Point::new(PAGE_WIDTH - self.margin, y), false),
            ],
            is_closed: false,
        });
        self.y -= line_height(size, self.styles);
    }

    fn gap(&mut self, points: f32) {
        self.y -= Mm(points * PT_TO_MM);
    }

    fn ensure_room(&mut self, size: f32) {
        if self.y - line_height(size, self.styles) < self.margin {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - self.margin;
        self.pages += 1;
    }
}

fn line_height(size: f32, styles: &DocumentStyles) -> Mm {
    Mm(size * styles.line_spacing * PT_TO_MM)
}

/// Estimated rendered width in millimetres.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let glyph = if bold { BOLD_GLYPH_WIDTH } else { AVG_GLYPH_WIDTH };
    text.chars().count() as f32 * glyph * size * PT_TO_MM
}

/// Break spans into lines no wider than `width_mm`, splitting on whitespace.
///
/// A word wider than the column on its own is cut into column-wide pieces.
pub fn wrap_spans(spans: &[Span], size: f32, width_mm: f32) -> Vec<Vec<Span>> {
    let mut lines: Vec<Vec<Span>> = Vec::new();
    let mut line: Vec<Span> = Vec::new();
    let mut used = 0.0;

    for span in spans {
        for whole in span.text.split_whitespace() {
            for word in split_long_word(whole, size, span.bold, width_mm) {
                let needs_space = !line.is_empty();
                let piece = if needs_space {
                    format!(" {word}")
                } else {
                    word.to_string()
                };
                let piece_width = text_width(&piece, size, span.bold);

                if needs_space && used + piece_width > width_mm {
                    lines.push(std::mem::take(&mut line));
                    push_piece(&mut line, word.to_string(), span.bold);
                    used = text_width(word, size, span.bold);
                } else {
                    push_piece(&mut line, piece, span.bold);
                    used += piece_width;
                }
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Chunks of `word` that each fit in `width_mm`, at least one char each.
fn split_long_word(word: &str, size: f32, bold: bool, width_mm: f32) -> Vec<&str> {
    let glyph = text_width("m", size, bold);
    let per_line = ((width_mm / glyph).floor() as usize).max(1);
    if word.chars().count() <= per_line {
        return vec![word];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    for (count, (idx, _)) in word.char_indices().enumerate() {
        if count > 0 && count % per_line == 0 {
            chunks.push(&word[start..idx]);
            start = idx;
        }
    }
    chunks.push(&word[start..]);
    chunks
}

/// Merge into the previous span when the weight matches.
fn push_piece(line: &mut Vec<Span>, text: String, bold: bool) {
    match line.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(&text),
        _ => line.push(Span { text, bold }),
    }
}

/// Builtin fonts only cover WinAnsi; map common typography and drop the rest.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '*',
            c if (c as u32) < 0x100 => c,
            _ => '?',
        })
        .collect()
}
