use chrono::{DateTime, Local, TimeZone, Utc};

/// Current time as epoch milliseconds, the unit every stored timestamp uses.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn millis_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Render an epoch-millisecond timestamp in local time for listings.
pub fn format_millis(ms: i64) -> String {
    match millis_to_datetime(ms) {
        Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
