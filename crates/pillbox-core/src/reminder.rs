//! Reminder — a medicine name with the date and time it is due.
//!
//! Dates and times are kept as the exact text that is persisted. Whether a
//! reminder is due is decided by comparing [`Reminder::due_key`] with a freshly
//! formatted [`due_stamp`](crate::time::due_stamp), not by clock arithmetic.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  time::{normalize_date, normalize_time, parse_due_stamp},
};

// ─── Persisted row ───────────────────────────────────────────────────────────

/// A reminder as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
  /// Assigned by the store on insert; never changes.
  pub id:   i64,
  pub name: String,
  /// `YYYY-MM-DD`.
  pub date: String,
  /// `HH:MM AM/PM`.
  pub time: String,
}

impl Reminder {
  /// The text compared against the current due stamp.
  pub fn due_key(&self) -> String { format!("{} {}", self.date, self.time) }

  /// The reminder's date and time as a clock value, if the stored text
  /// parses.
  pub fn chronological_key(&self) -> Option<NaiveDateTime> {
    parse_due_stamp(&self.due_key())
  }
}

/// Re-sort reminders by clock order instead of stored-text order.
///
/// Rows whose text does not parse keep their relative order and go last.
pub fn sort_chronologically(reminders: &mut [Reminder]) {
  reminders.sort_by_cached_key(|r| {
    let key = r.chronological_key();
    (key.is_none(), key)
  });
}

// ─── Validated input ─────────────────────────────────────────────────────────

/// The three user-editable fields of a reminder, already validated.
///
/// Only [`NewReminder::parse`] builds one, so any value reaching a store has a
/// non-empty name, a real calendar date and a normalised time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
  name: String,
  date: String,
  time: String,
}

impl NewReminder {
  /// Validate raw user input.
  ///
  /// The name is trimmed and must be non-empty. The date must be a real
  /// `YYYY-MM-DD` date. The time is normalised with
  /// [`normalize_time`](crate::time::normalize_time).
  pub fn parse(name: &str, date: &str, time: &str) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::EmptyName);
    }

    Ok(Self {
      name: name.to_owned(),
      date: normalize_date(date)?,
      time: normalize_time(time)?,
    })
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn date(&self) -> &str { &self.date }

  pub fn time(&self) -> &str { &self.time }

  /// Attach a store-assigned id.
  pub fn into_reminder(self, id: i64) -> Reminder {
    Reminder { id, name: self.name, date: self.date, time: self.time }
  }
}
