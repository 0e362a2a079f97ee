//! dermascan-export
//!
//! Share links, Markdown rendering and PDF/DOCX generation for screening
//! results.

pub mod docx;
pub mod error;
pub mod markdown;
pub mod pdf;
pub mod render;
pub mod share;
pub mod styles;
