//! dermascan-app
//!
//! Wires the screening pipeline together: configuration, AWS setup, logging,
//! device ports and the screening session.

pub mod aws;
pub mod config;
pub mod error;
pub mod ports;
pub mod session;
pub mod telemetry;

pub use error::AppError;
pub use session::{ScreeningResult, ScreeningSession, SessionOptions, SessionState, open_session};
