use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_CAP: usize = 20;

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Maximum number of history records kept. Never below 1.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    /// Model used for new analyses. `None` falls back to the configured model.
    #[serde(default)]
    pub selected_model: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            selected_model: None,
        }
    }
}

impl Settings {
    pub fn effective_history_cap(&self) -> usize {
        self.history_cap.max(1)
    }
}

fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}
