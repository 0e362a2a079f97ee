//! dermascan-core
//!
//! Pure domain types, the structured-block vocabulary shared by the prompt
//! builder and the response parser, and local storage key conventions.
//! No AWS SDK dependency. This is the shared vocabulary of the system.

pub mod block;
pub mod error;
pub mod models;
pub mod storage_keys;
