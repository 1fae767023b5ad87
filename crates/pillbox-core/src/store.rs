//! The `ReminderStore` trait.
//!
//! Implemented by storage backends (e.g. `pillbox-store-sqlite`). The poller
//! and the command-line front end depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::reminder::{NewReminder, Reminder};

/// Abstraction over a reminder store backend.
///
/// All methods return `Send` futures so a store can be shared with a
/// background task on a multi-threaded tokio runtime.
pub trait ReminderStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Ensure the backing schema exists. Idempotent; existing rows are left
  /// untouched.
  fn initialize(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Persist a new reminder and return its assigned id.
  fn add<'a>(
    &'a self,
    input: &'a NewReminder,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// Overwrite name, date and time of reminder `id`.
  ///
  /// An unknown id is not an error: nothing is written and `false` is
  /// returned.
  fn update<'a>(
    &'a self,
    id: i64,
    input: &'a NewReminder,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Remove reminder `id`. Returns `false` if there was no such row.
  fn delete(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Retrieve a reminder by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Reminder>, Self::Error>> + Send + '_;

  /// Every reminder, ordered by the stored text of `(date, time)`.
  ///
  /// This is text order, not clock order: `01:00 PM` sorts before
  /// `09:00 AM` on the same date.
  fn list_all(&self) -> impl Future<Output = Result<Vec<Reminder>, Self::Error>> + Send + '_;

  /// Names of every reminder whose `date + " " + time` equals `stamp`
  /// exactly.
  fn find_due<'a>(
    &'a self,
    stamp: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;
}
