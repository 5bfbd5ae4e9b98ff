//! Time related utils.

use chrono::Utc;

/// DateTime in UTC.
pub type DateTime = chrono::DateTime<Utc>;

/// Return the current UTC time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a datetime as an HTTP `Date` header value, RFC 1123 with a numeric
/// zone offset.
///
/// ```text
/// Tue, 10 Nov 2009 23:00:00 +0000
/// ```
pub fn format_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}
