//! dermascan-storage
//!
//! Local persistence for history, lesion profiles and settings. Everything
//! lives under three fixed keys in a byte-quota-limited key-value store.

pub mod error;
pub mod file;
pub mod history;
pub mod lesions;
pub mod memory;
pub mod settings;
pub mod state;
pub mod store;

pub use file::FileStore;
pub use history::{AppendOutcome, HistoryStore};
pub use lesions::LesionStore;
pub use memory::MemoryStore;
pub use settings::SettingsStore;
pub use store::KeyValueStore;
