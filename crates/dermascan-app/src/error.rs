use thiserror::Error;

use dermascan_core::error::CoreError;
use dermascan_export::error::ExportError;
use dermascan_storage::error::StorageError;

/// The only message shown to the user when an analysis call fails.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please try again.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Analysis failed. Please try again.")]
    AnalysisFailed,

    #[error("no screening result to export")]
    NoResult,

    #[error("history record not found: {0}")]
    RecordNotFound(uuid::Uuid),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Port(#[from] PortError),
}

/// Failures reported by device ports.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{0} is not available on this device")]
    Unavailable(&'static str),

    #[error("{0} is not open")]
    NotOpen(&'static str),

    #[error("device error: {0}")]
    Device(String),
}
