use dermascan_core::models::history::{HistoryRecord, ImageRef};
use dermascan_core::models::request::ImageMediaType;
use dermascan_core::models::response::AnalysisResponse;

/// A record stamped `second` seconds after the epoch.
pub fn record(second: i64) -> HistoryRecord {
    let mut record = HistoryRecord::new(
        ImageRef::from_bytes(ImageMediaType::Jpeg, &[0xFF, 0xD8, second as u8]),
        AnalysisResponse::new(format!("report {second}")),
    );
    record.timestamp = jiff::Timestamp::from_second(second).expect("valid timestamp");
    record
}
