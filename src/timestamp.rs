//! RFC-1123 GMT timestamps for response headers and `If-Modified-Since`
//! (spec.md §4.3), backed by the `httpdate` crate the teacher already
//! depends on rather than a hand-rolled `strftime`.

use std::time::SystemTime;

use crate::error::CoreError;

/// `Wkd, DD Mon YYYY HH:MM:SS GMT`, 29 bytes, for the current instant.
pub fn now_rfc1123() -> String {
    httpdate::fmt_http_date(SystemTime::now())
}

/// Same format for an arbitrary instant, e.g. a file's mtime.
pub fn format_rfc1123(t: SystemTime) -> String {
    httpdate::fmt_http_date(t)
}

/// Parse an `If-Modified-Since` value. Only the fixed-length RFC-1123 form
/// is accepted; `httpdate` itself also understands RFC-850 and asctime
/// dates, so the length is checked first to reject those per spec.md §6.
pub fn parse_rfc1123(value: &[u8]) -> Result<SystemTime, CoreError> {
    if value.len() != 29 {
        return Err(CoreError::Malformed);
    }
    let s = std::str::from_utf8(value).map_err(|_| CoreError::Malformed)?;
    httpdate::parse_http_date(s).map_err(|_| CoreError::Malformed)
}

/// Truncate a `SystemTime` to second precision, the resolution at which
/// all HTTP date comparisons in this server happen.
pub fn truncate_to_secs(t: SystemTime) -> SystemTime {
    let secs = t
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(secs)
}
