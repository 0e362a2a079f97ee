use serde::{Deserialize, Serialize};

const MM_PER_INCH: f32 = 25.4;

/// Fonts, sizes and margins shared by the PDF and DOCX writers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Body font name used in DOCX output. PDF output uses Helvetica.
    pub body_font: String,

    pub heading_font: String,

    /// Body text size in points.
    pub body_size: usize,

    pub heading1_size: usize,

    pub heading2_size: usize,

    pub heading3_size: usize,

    /// Page margin in inches (applied uniformly).
    pub margin_inches: f32,

    /// Line height as a multiple of the font size.
    pub line_spacing: f32,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Calibri".to_string(),
            heading_font: "Calibri".to_string(),
            body_size: 11,
            heading1_size: 18,
            heading2_size: 14,
            heading3_size: 12,
            margin_inches: 0.8,
            line_spacing: 1.35,
        }
    }
}

impl DocumentStyles {
    pub fn margin_mm(&self) -> f32 {
        self.margin_inches * MM_PER_INCH
    }

    /// Point size for a heading level (1-based); deeper levels use level 3.
    pub fn heading_size(&self, level: u8) -> usize {
        match level {
            1 => self.heading1_size,
            2 => self.heading2_size,
            _ => self.heading3_size,
        }
    }
}
