//! Device collaborators: camera capture and speech dictation.
//!
//! Hosts implement these ports. Each port reports whether it can work on
//! the current device through `probe`, and the matching control is disabled
//! when it cannot.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dermascan_core::models::request::{AnalysisRequest, ImageMediaType};

use crate::error::{AppError, PortError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub media_type: ImageMediaType,
}

/// A camera. `open` acquires the device and `close` releases it.
pub trait CapturePort {
    fn probe(&self) -> bool;
    fn open(&mut self) -> Result<(), PortError>;
    fn capture(&mut self) -> Result<CapturedImage, PortError>;
    fn close(&mut self) -> Result<(), PortError>;
}

/// Speech-to-text for the notes field. `stop` ends the session and yields
/// the transcript.
pub trait DictationPort {
    fn probe(&self) -> bool;
    fn start(&mut self) -> Result<(), PortError>;
    fn stop(&mut self) -> Result<String, PortError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    Enabled,
    Disabled,
}

impl ControlState {
    fn from_probe(available: bool) -> Self {
        if available { Self::Enabled } else { Self::Disabled }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub camera: ControlState,
    pub dictation: ControlState,
}

impl Capabilities {
    /// A missing port counts as unsupported.
    pub fn probe(
        capture: Option<&dyn CapturePort>,
        dictation: Option<&dyn DictationPort>,
    ) -> Self {
        let caps = Self {
            camera: ControlState::from_probe(capture.is_some_and(|c| c.probe())),
            dictation: ControlState::from_probe(dictation.is_some_and(|d| d.probe())),
        };
        info!(camera = ?caps.camera, dictation = ?caps.dictation, "probed device capabilities");
        caps
    }
}

/// Take one photo and release the camera, even when capture fails.
pub fn capture_request(
    port: &mut dyn CapturePort,
    notes: Option<String>,
    model_id: &str,
) -> Result<AnalysisRequest, AppError> {
    if !port.probe() {
        return Err(PortError::Unavailable("camera").into());
    }
    port.open()?;
    let captured = port.capture();
    if let Err(e) = port.close() {
        warn!(error = %e, "failed to release camera");
    }
    let image = captured?;
    Ok(AnalysisRequest::new(image.bytes, image.media_type, notes, model_id)?)
}

/// Merge a dictated transcript into existing notes.
///
/// Blank transcripts leave the notes untouched; otherwise the transcript is
/// appended after a single space.
pub fn append_dictation(notes: &str, transcript: &str) -> String {
    let transcript = transcript.trim();
    let notes = notes.trim_end();
    match (notes.is_empty(), transcript.is_empty()) {
        (_, true) => notes.to_string(),
        (true, false) => transcript.to_string(),
        (false, false) => format!("{notes} {transcript}"),
    }
}
