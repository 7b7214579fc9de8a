use crate::types::Timestamp;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Parse an RFC 3339 timestamp into Unix milliseconds.
///
/// Returns `None` for anything chrono refuses, callers decide whether that
/// is fatal.
pub fn parse_rfc3339_millis(value: &str) -> Option<Timestamp> {
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp_millis())
}
