//! HTTP date handling for conditional requests
//!
//! File responses carry `Last-Modified`; a client replaying the date in
//! `If-Modified-Since` gets 304 instead of the body. Comparison happens at
//! second granularity, matching the precision of the header format.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parse an HTTP date header value
///
/// RFC 9110 requires recipients to accept the obsolete RFC 850 and asctime
/// forms too; the RFC 2822 parser covers the dominant IMF-fixdate form and
/// that is all real clients send back to us.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Decide whether a 304 applies: true when the file has not been modified
/// after the client's `If-Modified-Since` timestamp.
pub fn not_modified(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_http_date_format() {
        // 1994-11-06 08:49:37 UTC, the RFC's own example date
        let time = UNIX_EPOCH + Duration::from_secs(784_111_777);
        assert_eq!(http_date(time), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_round_trip() {
        let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let formatted = http_date(time);
        let parsed = parse_http_date(&formatted).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_not_modified_when_client_is_current() {
        let mtime = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let header = http_date(mtime);
        assert!(not_modified(Some(&header), mtime));
    }

    #[test]
    fn test_modified_when_client_is_stale() {
        let mtime = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let stale = http_date(UNIX_EPOCH + Duration::from_secs(1_600_000_000));
        assert!(!not_modified(Some(&stale), mtime));
    }

    #[test]
    fn test_subsecond_mtime_still_matches() {
        let header_time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let mtime = header_time + Duration::from_millis(500);
        assert!(not_modified(Some(&http_date(header_time)), mtime));
    }

    #[test]
    fn test_garbage_header_is_ignored() {
        let mtime = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert!(!not_modified(Some("not a date"), mtime));
        assert!(!not_modified(None, mtime));
    }
}
