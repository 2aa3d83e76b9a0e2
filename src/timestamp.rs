//! Codec for the browser's visit-time encoding: microseconds elapsed
//! since 1601-01-01T00:00:00 UTC, converted to and from local calendar
//! time.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{HistoryError, Result};

/// Seconds between 1601-01-01 and the Unix epoch.
const EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

const MICROS_PER_SEC: i64 = 1_000_000;

/// Convert a raw browser-epoch timestamp into local time.
pub fn decode(raw: i64) -> Option<DateTime<Local>> {
    let unix_micros = raw.checked_sub(EPOCH_OFFSET_SECS * MICROS_PER_SEC)?;
    let secs = unix_micros.div_euclid(MICROS_PER_SEC);
    let nsecs = (unix_micros.rem_euclid(MICROS_PER_SEC) as u32) * 1000;
    DateTime::<Utc>::from_timestamp(secs, nsecs).map(|dt| dt.with_timezone(&Local))
}

/// Render a raw timestamp as `YYYY-MM-DD HH:mm:ss` in local time,
/// truncated to whole seconds. Values outside the representable range
/// fall back to the raw integer.
pub fn format(raw: i64) -> String {
    match decode(raw) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// Parse a user-supplied local date string into browser-epoch
/// microseconds, for use as a range-filter bound.
pub fn encode(input: &str) -> Result<i64> {
    let naive = parse_naive(input.trim()).ok_or_else(|| HistoryError::InvalidDate {
        input: input.to_string(),
    })?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| HistoryError::InvalidDate {
            input: input.to_string(),
        })?;
    let unix_micros =
        local.timestamp() * MICROS_PER_SEC + i64::from(local.timestamp_subsec_micros());
    Ok(unix_micros + EPOCH_OFFSET_SECS * MICROS_PER_SEC)
}

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_second_granularity() {
        for input in ["2022-07-28 09:15:30", "1999-12-31 23:59:59", "2024-02-29 00:00:00"] {
            let raw = encode(input).expect("encode");
            assert_eq!(format(raw), input);
        }
    }

    #[test]
    fn date_only_means_local_midnight() {
        let raw = encode("2023-05-01").expect("encode");
        assert_eq!(format(raw), "2023-05-01 00:00:00");
    }

    #[test]
    fn decode_lands_in_expected_day() {
        // 13_303_449_600_000_000 us == 2022-07-28 00:00:00 UTC.
        let rendered = format(13_303_449_600_000_000);
        assert!(rendered.starts_with("2022-07-2"), "got {rendered}");
    }

    #[test]
    fn encode_preserves_ordering() {
        let earlier = encode("2022-07-28 09:00:00").expect("encode");
        let later = encode("2022-07-28 09:00:01").expect("encode");
        assert_eq!(later - earlier, 1_000_000);
    }

    #[test]
    fn rejects_garbage_dates() {
        for input in ["", "not a date", "2022-13-40", "tomorrow"] {
            let err = encode(input).expect_err("should fail");
            assert!(matches!(err, HistoryError::InvalidDate { .. }));
        }
    }

    #[test]
    fn out_of_range_raw_falls_back_to_digits() {
        assert_eq!(format(i64::MIN), i64::MIN.to_string());
    }
}
