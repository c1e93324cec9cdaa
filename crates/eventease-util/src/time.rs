//! Clock helpers for eventease
//!
//! Booking dates and the "upcoming events" views depend on today's date, so
//! all components read the clock through [`now`] and [`today`].
//!
//! # Mock Time for Development
//!
//! In debug builds, the `EVENTEASE_MOCK_TIME` environment variable can be set
//! to override the system time. The mock clock advances at the same rate as
//! real time from the moment it is first read.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-06-01 09:00:00`)
//!
//! ```bash
//! EVENTEASE_MOCK_TIME="2025-06-01 09:00:00" eventease events upcoming
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "EVENTEASE_MOCK_TIME";

/// Format accepted by [`MOCK_TIME_ENV_VAR`]
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let mock_time_str = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            parse_mock_offset(&mock_time_str, Local::now())
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Compute the offset between a mock time string and `real_now`.
fn parse_mock_offset(mock_time_str: &str, real_now: DateTime<Local>) -> Option<chrono::Duration> {
    let naive_dt = match NaiveDateTime::parse_from_str(mock_time_str, MOCK_TIME_FORMAT) {
        Ok(dt) => dt,
        Err(_) => {
            tracing::warn!(
                mock_time = %mock_time_str,
                expected_format = MOCK_TIME_FORMAT,
                "Invalid mock time format"
            );
            return None;
        }
    };

    let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() else {
        tracing::warn!(
            mock_time = %mock_time_str,
            "Failed to convert mock time to local timezone"
        );
        return None;
    };

    let offset = mock_dt.signed_duration_since(real_now);
    tracing::info!(
        mock_time = %mock_time_str,
        offset_secs = offset.num_seconds(),
        "Mock time enabled"
    );
    Some(offset)
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Today's calendar date in local time.
pub fn today() -> NaiveDate {
    now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_today_matches_now() {
        let before = now().date_naive();
        let d = today();
        let after = now().date_naive();
        assert!(d >= before && d <= after);
    }

    #[test]
    fn test_parse_mock_offset() {
        let real_now = Local.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let offset = parse_mock_offset("2025-01-02 12:00:00", real_now).unwrap();
        assert_eq!(offset.num_hours(), 24);
    }

    #[test]
    fn test_parse_mock_offset_rejects_bad_formats() {
        let real_now = Local.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        for bad in ["2025-01-02", "2025/01/02 12:00:00", "2025-01-02T12:00:00", ""] {
            assert!(
                parse_mock_offset(bad, real_now).is_none(),
                "Expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_inactive_mock_time_follows_wall_clock() {
        assert_eq!(is_mock_time_active(), get_mock_time_offset().is_some());
        if !is_mock_time_active() {
            let drift = (now() - Local::now()).num_seconds().abs();
            assert!(drift <= 1, "unexpected drift of {}s", drift);
        }
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_mock_time_never_active_in_release() {
        assert!(!is_mock_time_active());
    }
}
