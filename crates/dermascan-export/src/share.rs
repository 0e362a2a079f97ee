//! Self-contained share links.
//!
//! The whole response travels in the URL: JSON, raw-deflated, then base64url
//! without padding, under the `share` query parameter. Nothing is uploaded.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use tracing::debug;

use dermascan_core::models::response::AnalysisResponse;

use crate::error::ExportError;

pub const SHARE_PARAM: &str = "share";

/// Decompressed payloads larger than this are rejected.
const MAX_DECODED_BYTES: u64 = 4 * 1024 * 1024;

pub fn encode_response(response: &AnalysisResponse) -> Result<String, ExportError> {
    let json = serde_json::to_vec(response)?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;
    debug!(json_bytes = json.len(), compressed_bytes = compressed.len(), "encoded share payload");
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

pub fn decode_response(payload: &str) -> Result<AnalysisResponse, ExportError> {
    let compressed = URL_SAFE_NO_PAD
        .decode(payload.trim().trim_end_matches('='))
        .map_err(|e| ExportError::InvalidShareLink(format!("bad encoding: {e}")))?;

    let mut json = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .take(MAX_DECODED_BYTES + 1)
        .read_to_end(&mut json)
        .map_err(|e| ExportError::InvalidShareLink(format!("bad compression: {e}")))?;
    if json.len() as u64 > MAX_DECODED_BYTES {
        return Err(ExportError::InvalidShareLink("payload too large".to_string()));
    }

    serde_json::from_slice(&json)
        .map_err(|e| ExportError::InvalidShareLink(format!("bad payload: {e}")))
}

/// Append the encoded response to `base` as the `share` query parameter,
/// keeping any existing query and fragment.
pub fn share_url(base: &str, response: &AnalysisResponse) -> Result<String, ExportError> {
    let payload = encode_response(response)?;
    let (head, fragment) = match base.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (base, None),
    };
    let separator = match head.find('?') {
        None => "?",
        Some(idx) if idx == head.len() - 1 || head.ends_with('&') => "",
        Some(_) => "&",
    };

    let mut url = format!("{head}{separator}{SHARE_PARAM}={payload}");
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    Ok(url)
}

/// The raw `share` parameter of a URL, if present and non-empty.
pub fn share_param(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let (_, query) = without_fragment.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SHARE_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

pub fn response_from_url(url: &str) -> Result<AnalysisResponse, ExportError> {
    let payload = share_param(url).ok_or_else(|| {
        ExportError::InvalidShareLink(format!("no `{SHARE_PARAM}` parameter in link"))
    })?;
    decode_response(payload)
}
