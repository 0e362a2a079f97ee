//! The small Markdown subset that exported reports use.
//!
//! - `#`, `##`, `###` headings
//! - `- ` or `* ` bullets
//! - `**bold**` runs inside a line
//! - `---`, `***` or `___` horizontal rules
//! - a `<!-- pagebreak -->` line forces a new page
//! - everything else is a paragraph line

pub const PAGE_BREAK: &str = "<!-- pagebreak -->";

/// A run of text with uniform weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet(Vec<Span>),
    Paragraph(Vec<Span>),
    Rule,
    PageBreak,
    Blank,
}

pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    markdown.lines().map(parse_line).collect()
}

fn parse_line(line: &str) -> Block {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Block::Blank;
    }
    if trimmed.eq_ignore_ascii_case(PAGE_BREAK) {
        return Block::PageBreak;
    }
    if matches!(trimmed, "---" | "***" | "___") {
        return Block::Rule;
    }

    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        if let Some(text) = trimmed[hashes..].strip_prefix(' ') {
            return Block::Heading {
                level: hashes.min(3) as u8,
                text: strip_markers(text.trim()),
            };
        }
    }

    if let Some(text) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return Block::Bullet(parse_inline(text.trim()));
    }

    Block::Paragraph(parse_inline(trimmed))
}

/// Split `**bold**` runs out of a line. An unmatched `**` is kept as text.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut remaining = text;

    while let Some(start) = remaining.find("**") {
        let after = &remaining[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        push_span(&mut spans, &remaining[..start], false);
        push_span(&mut spans, &after[..end], true);
        remaining = &after[end + 2..];
    }
    push_span(&mut spans, remaining, false);
    spans
}

fn push_span(spans: &mut Vec<Span>, text: &str, bold: bool) {
    if !text.is_empty() {
        spans.push(Span {
            text: text.to_string(),
            bold,
        });
    }
}

fn strip_markers(text: &str) -> String {
    parse_inline(text).into_iter().map(|s| s.text).collect()
}
