//! Wall-clock source for the poller.

use chrono::{Local, NaiveDateTime};

pub trait Clock: Send + Sync {
  /// Current local wall-clock time.
  fn now(&self) -> NaiveDateTime;
}

/// The machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> NaiveDateTime { Local::now().naive_local() }
}

/// Always reports the same instant. Used to check a specific minute on demand.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
  fn now(&self) -> NaiveDateTime { self.0 }
}
