//! JSON request messages.

use bytes::Bytes;
use chrono::NaiveDateTime;
use qhp_types::Timeframe;
use serde::Serialize;

/// Datetime format used on the wire (local time, no zone suffix).
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Status frame sent by the far end on success.
pub const STATUS_OK: &[u8] = b"OK";

/// Request for one symbol's bars over a time range.
#[derive(Debug, Clone, Serialize)]
pub struct FetchRequest<'a> {
    /// Symbol to fetch.
    pub ticker: &'a str,
    /// Range start.
    #[serde(serialize_with = "wire_time")]
    pub from: NaiveDateTime,
    /// Range end.
    #[serde(serialize_with = "wire_time")]
    pub to: NaiveDateTime,
    /// Bar width.
    pub timeframe: Timeframe,
}

/// Request storing a payload of bars in the history archive.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRequest<'a> {
    /// Symbol the bars are stored under.
    pub ticker: &'a str,
    /// Timestamp of the earliest bar.
    #[serde(serialize_with = "wire_time")]
    pub start_time: NaiveDateTime,
    /// Timestamp of the latest bar.
    #[serde(serialize_with = "wire_time")]
    pub end_time: NaiveDateTime,
    /// Bar width in seconds.
    pub timeframe_sec: u64,
}

/// Request for the list of securities known to the quote store.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SecurityListRequest {
    /// Always true.
    pub get_sec_list: bool,
}

impl Default for SecurityListRequest {
    fn default() -> Self {
        Self { get_sec_list: true }
    }
}

/// Serializes a request into a single JSON frame.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn json_frame<T: Serialize>(request: &T) -> Result<Bytes, serde_json::Error> {
    serde_json::to_vec(request).map(Bytes::from)
}

fn wire_time<S: serde::Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&dt.format(WIRE_TIME_FORMAT))
}
