//! Date and time text handling.
//!
//! Reminders store their date and time as plain text. Due-matching compares
//! `date + " " + time` against [`due_stamp`] of the current local time, so the
//! formats produced here and the format of the stamp must agree exactly.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{Error, Result};

/// `chrono` format of a stored date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `chrono` format of a stored time: zero-padded 12-hour clock, uppercase
/// meridiem.
pub const TIME_FORMAT: &str = "%I:%M %p";

/// `chrono` format of a due stamp, i.e. a stored date and time joined by a
/// single space.
pub const DUE_STAMP_FORMAT: &str = "%Y-%m-%d %I:%M %p";

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Normalise a 12-hour clock time to `HH:MM AM/PM`.
///
/// Accepts one or two digit hours and minutes and the meridiem in any case,
/// with or without a space before it: `8:30am`, `08:30 pm`, `12:05 AM`.
pub fn normalize_time(input: &str) -> Result<String> {
  NaiveTime::parse_from_str(input.trim(), TIME_FORMAT)
    .map(|t| t.format(TIME_FORMAT).to_string())
    .map_err(|_| Error::InvalidTime(input.to_owned()))
}

/// Check that `input` is a real calendar date and return it as `YYYY-MM-DD`.
pub fn normalize_date(input: &str) -> Result<String> {
  let trimmed = input.trim();
  NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
    .map(|d| d.format(DATE_FORMAT).to_string())
    .map_err(|_| Error::InvalidDate(input.to_owned()))
}

// ─── Due stamps ──────────────────────────────────────────────────────────────

/// Format a local wall-clock time the way due reminders are matched,
/// e.g. `2025-06-01 08:30 AM`.
pub fn due_stamp(now: NaiveDateTime) -> String {
  now.format(DUE_STAMP_FORMAT).to_string()
}

/// Parse a due stamp back into a comparable timestamp.
pub fn parse_due_stamp(stamp: &str) -> Option<NaiveDateTime> {
  NaiveDateTime::parse_from_str(stamp, DUE_STAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn normalizes_lowercase_without_space() {
    assert_eq!(normalize_time("8:30am").unwrap(), "08:30 AM");
  }

  #[test]
  fn normalizes_padded_and_spaced_forms() {
    assert_eq!(normalize_time("08:30 AM").unwrap(), "08:30 AM");
    assert_eq!(normalize_time("  11:05 pm ").unwrap(), "11:05 PM");
    assert_eq!(normalize_time("12:00 Am").unwrap(), "12:00 AM");
    assert_eq!(normalize_time("7:5 PM").unwrap(), "07:05 PM");
  }

  #[test]
  fn rejects_out_of_range_and_malformed_times() {
    for bad in [
      "25:99", "13:00 PM", "00:30 AM", "08:60 AM", "8:30", "", "AM", "08:300 AM",
      "aa:bb PM",
    ] {
      assert_eq!(
        normalize_time(bad),
        Err(Error::InvalidTime(bad.to_owned())),
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn normalizes_dates() {
    assert_eq!(normalize_date("2025-06-01").unwrap(), "2025-06-01");
    assert_eq!(normalize_date(" 2024-02-29 ").unwrap(), "2024-02-29");
  }

  #[test]
  fn rejects_impossible_dates() {
    assert!(matches!(normalize_date("2025-02-30"), Err(Error::InvalidDate(_))));
    assert!(matches!(normalize_date("06/01/2025"), Err(Error::InvalidDate(_))));
    assert!(matches!(normalize_date(""), Err(Error::InvalidDate(_))));
  }

  #[test]
  fn due_stamp_uses_padded_twelve_hour_clock() {
    let morning = NaiveDate::from_ymd_opt(2025, 6, 1)
      .unwrap()
      .and_hms_opt(8, 30, 59)
      .unwrap();
    assert_eq!(due_stamp(morning), "2025-06-01 08:30 AM");

    let evening = NaiveDate::from_ymd_opt(2025, 12, 31)
      .unwrap()
      .and_hms_opt(21, 5, 0)
      .unwrap();
    assert_eq!(due_stamp(evening), "2025-12-31 09:05 PM");

    let midnight = NaiveDate::from_ymd_opt(2025, 1, 1)
      .unwrap()
      .and_hms_opt(0, 0, 0)
      .unwrap();
    assert_eq!(due_stamp(midnight), "2025-01-01 12:00 AM");
  }

  #[test]
  fn due_stamp_parses_back() {
    let at = NaiveDate::from_ymd_opt(2025, 6, 1)
      .unwrap()
      .and_hms_opt(13, 45, 0)
      .unwrap();
    assert_eq!(parse_due_stamp(&due_stamp(at)), Some(at));
    assert_eq!(parse_due_stamp("not a stamp"), None);
  }
}
