//! Local storage key conventions.
//!
//! Pure string constants. These define the canonical layout of values in the
//! key-value store backing history, lesion profiles and settings.

pub const HISTORY: &str = "dermascan.history";

pub const LESIONS: &str = "dermascan.lesions";

pub const SETTINGS: &str = "dermascan.settings";

/// File name used by file-backed stores for a given key.
pub fn file_name(key: &str) -> String {
    format!("{key}.json")
}
