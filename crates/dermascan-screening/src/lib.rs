//! dermascan-screening
//!
//! Turns the model's free-text reply into typed screening results. Pure
//! logic with no AWS dependency and no I/O. The parser degrades to sentinel
//! values on malformed input and never fails.

pub mod citations;
pub mod glossary;
pub mod parse;
pub mod present;
pub mod render;
pub mod risk;

pub use parse::{ParsedResponse, parse_response};
pub use render::render_block;
pub use risk::{RiskAssessment, assess};
