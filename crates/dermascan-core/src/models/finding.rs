use std::fmt;

use serde::{Deserialize, Serialize};

/// One screening criterion: an ABCDE letter or the general moles check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingCode {
    A,
    B,
    C,
    D,
    E,
    #[serde(rename = "M")]
    Moles,
}

impl FindingCode {
    pub const ALL: [FindingCode; 6] = [
        FindingCode::A,
        FindingCode::B,
        FindingCode::C,
        FindingCode::D,
        FindingCode::E,
        FindingCode::Moles,
    ];

    /// Short wire code: `"A"`..`"E"`, or `"M"` for moles.
    pub fn code(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::Moles => "M",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::A => "Asymmetry",
            Self::B => "Border",
            Self::C => "Color",
            Self::D => "Diameter",
            Self::E => "Evolution",
            Self::Moles => "Moles",
        }
    }

    /// Resolve a code token as written by the model (`"a"`, `"E"`, `"moles"`).
    ///
    /// Returns `None` for anything outside the six known criteria.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case(crate::block::MOLES_KEYWORD) {
            return Some(Self::Moles);
        }
        match token.to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            _ => None,
        }
    }

    /// The token the re-serializer writes at the start of a criterion line.
    pub fn line_token(self) -> &'static str {
        match self {
            Self::Moles => crate::block::MOLES_KEYWORD,
            other => other.code(),
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingStatus {
    Benign,
    Suspicious,
    Unknown,
}

impl FindingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Benign => "Benign",
            Self::Suspicious => "Suspicious",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single labeled criterion parsed from the structured block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFinding {
    pub code: FindingCode,
    pub title: String,
    pub status: FindingStatus,
    pub summary: String,
}

impl ParsedFinding {
    pub fn new(code: FindingCode, status: FindingStatus, summary: impl Into<String>) -> Self {
        Self {
            code,
            title: code.title().to_string(),
            status,
            summary: summary.into(),
        }
    }
}
