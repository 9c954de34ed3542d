//! Timestamp formatting for time columns.
//!
//! Fractions are truncated, never rounded, to the requested precision.

use std::fmt::Write as _;

use chrono::{DateTime, TimeDelta, Utc};
use compact_str::CompactString;

use crate::column::TimestampPrecision;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// `HH:MM:SS.fraction`
pub fn format_time_of_day(ts: &DateTime<Utc>, precision: TimestampPrecision) -> CompactString {
    let mut out = CompactString::default();
    let _ = write!(out, "{}", ts.format("%H:%M:%S"));
    push_fraction(&mut out, subsec_nanos(ts), precision);
    out
}

/// `YYYY-MM-DD HH:MM:SS.fraction`
pub fn format_date_time(ts: &DateTime<Utc>, precision: TimestampPrecision) -> CompactString {
    let mut out = CompactString::default();
    let _ = write!(out, "{}", ts.format("%Y-%m-%d %H:%M:%S"));
    push_fraction(&mut out, subsec_nanos(ts), precision);
    out
}

/// Seconds since the Unix epoch, e.g. `1700000000.123456`.
pub fn format_epoch(ts: &DateTime<Utc>, precision: TimestampPrecision) -> CompactString {
    let total = i128::from(ts.timestamp()) * NANOS_PER_SEC + i128::from(subsec_nanos(ts));
    format_signed_nanos(total, precision)
}

/// Signed seconds, e.g. `0.000120` or `-1.500000`.
pub fn format_delta(delta: &TimeDelta, precision: TimestampPrecision) -> CompactString {
    let total = i128::from(delta.num_seconds()) * NANOS_PER_SEC + i128::from(delta.subsec_nanos());
    format_signed_nanos(total, precision)
}

// Leap seconds report more than a second of nanos.
fn subsec_nanos(ts: &DateTime<Utc>) -> u32 {
    ts.timestamp_subsec_nanos().min(999_999_999)
}

fn format_signed_nanos(total: i128, precision: TimestampPrecision) -> CompactString {
    let mut out = CompactString::default();
    if total < 0 {
        out.push('-');
    }
    let magnitude = total.unsigned_abs();
    let secs = magnitude / NANOS_PER_SEC as u128;
    let nanos = (magnitude % NANOS_PER_SEC as u128) as u32;
    let _ = write!(out, "{secs}");
    push_fraction(&mut out, nanos, precision);
    out
}

fn push_fraction(out: &mut CompactString, nanos: u32, precision: TimestampPrecision) {
    let digits = precision.digits();
    if digits == 0 {
        return;
    }
    let value = nanos / 10u32.pow(9 - digits);
    let _ = write!(out, ".{value:0width$}", width = digits as usize);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 123_456_789).single().unwrap()
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(
            format_time_of_day(&sample(), TimestampPrecision::Microseconds),
            "22:13:20.123456"
        );
        assert_eq!(format_time_of_day(&sample(), TimestampPrecision::Seconds), "22:13:20");
    }

    #[test]
    fn test_date_time() {
        assert_eq!(
            format_date_time(&sample(), TimestampPrecision::Milliseconds),
            "2023-11-14 22:13:20.123"
        );
    }

    #[test]
    fn test_epoch_truncates() {
        assert_eq!(
            format_epoch(&sample(), TimestampPrecision::Nanoseconds),
            "1700000000.123456789"
        );
        assert_eq!(
            format_epoch(&sample(), TimestampPrecision::Centiseconds),
            "1700000000.12"
        );
    }

    #[test]
    fn test_delta_signs() {
        assert_eq!(
            format_delta(&TimeDelta::microseconds(120), TimestampPrecision::Microseconds),
            "0.000120"
        );
        assert_eq!(
            format_delta(&TimeDelta::milliseconds(-1500), TimestampPrecision::Deciseconds),
            "-1.5"
        );
        assert_eq!(
            format_delta(&TimeDelta::zero(), TimestampPrecision::Milliseconds),
            "0.000"
        );
    }

    #[test]
    fn test_epoch_before_1970() {
        let ts = Utc.timestamp_opt(-1, 500_000_000).single().unwrap();
        assert_eq!(format_epoch(&ts, TimestampPrecision::Deciseconds), "-0.5");
    }
}
