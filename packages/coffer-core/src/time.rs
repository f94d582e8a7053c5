/// Returns the current Unix timestamp in seconds.
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Render a Unix timestamp as RFC 3339 for display, or the raw number if it
/// is out of chrono's range.
pub fn format_timestamp(ts: i64) -> String {
    match chrono::DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.to_rfc3339(),
        None => ts.to_string(),
    }
}
