//! Wall-clock timestamps at a fixed UTC+8 offset, independent of the host
//! timezone.

use chrono::{DateTime, FixedOffset, Utc};

/// Offset applied to every timestamp, in seconds east of UTC
pub const OFFSET_SECS: i32 = 8 * 3600;

fn offset() -> FixedOffset {
    FixedOffset::east_opt(OFFSET_SECS).expect("UTC+8 is within the valid offset range")
}

/// Convert a UTC instant into the log timezone
pub fn localize(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&offset())
}

/// `YYYY-MM-DD HH:mm:ss`, used in record headers
pub fn record_timestamp(instant: DateTime<Utc>) -> String {
    localize(instant).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `YYYY-MM-DDTHH-mm-ss`, safe for file names; used for session log files
pub fn file_timestamp(instant: DateTime<Utc>) -> String {
    localize(instant).format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// `YYYYMMDD-HHmmss-SSS`, millisecond resolution for artifact names
pub fn artifact_timestamp(instant: DateTime<Utc>) -> String {
    localize(instant).format("%Y%m%d-%H%M%S-%3f").to_string()
}
