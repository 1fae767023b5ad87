//! The background due-reminder loop.
//!
//! Each cycle formats the current minute as a due stamp, asks the store for
//! reminders with exactly that stamp, and notifies each one. There is no
//! dedup across cycles and no catch-up for minutes that were never sampled.

use std::{sync::Arc, time::Duration};

use pillbox_core::{ReminderStore, time::due_stamp};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
  clock::{Clock, SystemClock},
  notifier::{NotificationSink, Notifier},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Checks `store` for due reminders on a fixed interval and hands each one to
/// the notifier.
///
/// `C` decides what "now" is; tests swap in a [`FixedClock`](crate::FixedClock).
pub struct Poller<S, K, C = SystemClock> {
  store:    Arc<S>,
  notifier: Notifier<K>,
  clock:    C,
  interval: Duration,
}

impl<S, K> Poller<S, K>
where
  S: ReminderStore,
  K: NotificationSink,
{
  /// A poller on the local wall clock with [`DEFAULT_POLL_INTERVAL`].
  pub fn new(store: Arc<S>, notifier: Notifier<K>) -> Self {
    Self { store, notifier, clock: SystemClock, interval: DEFAULT_POLL_INTERVAL }
  }
}

impl<S, K, C> Poller<S, K, C>
where
  S: ReminderStore,
  K: NotificationSink,
  C: Clock,
{
  /// Time between cycles. Must be non-zero.
  pub fn with_interval(mut self, interval: Duration) -> Self {
    self.interval = interval;
    self
  }

  /// Replace the clock used to build each cycle's due stamp.
  pub fn with_clock<C2: Clock>(self, clock: C2) -> Poller<S, K, C2> {
    Poller {
      store:    self.store,
      notifier: self.notifier,
      clock,
      interval: self.interval,
    }
  }

  pub fn notifier(&self) -> &Notifier<K> { &self.notifier }

  /// Run a single cycle and return how many reminders were due.
  pub async fn check_once(&self) -> Result<usize, S::Error> {
    let stamp = due_stamp(self.clock.now());
    tracing::debug!(%stamp, "checking for due reminders");

    let names = self.store.find_due(&stamp).await?;
    if names.is_empty() {
      tracing::debug!(%stamp, "no reminder due");
    }

    for name in &names {
      tracing::info!(%stamp, medicine = %name, "reminder due");
      self.notifier.notify(name).await;
    }
    Ok(names.len())
  }

  /// Check once immediately, then once per interval, until `shutdown` is
  /// cancelled.
  ///
  /// A failed cycle is logged and skipped. Cancellation is observed between
  /// cycles; a cycle already in progress runs to completion.
  pub async fn run(self, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(self.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval_secs = self.interval.as_secs_f64(), "reminder poller started");

    loop {
      tokio::select! {
        biased;
        _ = shutdown.cancelled() => {
          tracing::info!("reminder poller stopped");
          return;
        }
        _ = ticker.tick() => {
          if let Err(error) = self.check_once().await {
            tracing::warn!(%error, "due check failed; skipping cycle");
          }
        }
      }
    }
  }
}

impl<S, K, C> Poller<S, K, C>
where
  S: ReminderStore + 'static,
  K: NotificationSink + 'static,
  C: Clock + 'static,
{
  /// Run the poller as a background task. Cancel `shutdown` and await the
  /// handle to stop it.
  pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(self.run(shutdown))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  };

  use chrono::{NaiveDate, NaiveDateTime};
  use pillbox_core::{NewReminder, Reminder};
  use pillbox_store_sqlite::SqliteStore;

  use super::*;
  use crate::{
    clock::FixedClock,
    notifier::tests::{FailingSink, RecordingSink},
  };

  fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
      .unwrap()
      .and_hms_opt(hour, minute, 12)
      .unwrap()
  }

  /// In-memory store that can be told to fail reads.
  #[derive(Default)]
  struct FakeStore {
    rows:    Mutex<Vec<Reminder>>,
    failing: AtomicBool,
    queries: AtomicUsize,
  }

  impl FakeStore {
    fn with(rows: &[(&str, &str, &str)]) -> Self {
      let rows = rows
        .iter()
        .enumerate()
        .map(|(i, (name, date, time))| Reminder {
          id:   i as i64 + 1,
          name: (*name).into(),
          date: (*date).into(),
          time: (*time).into(),
        })
        .collect();
      Self { rows: Mutex::new(rows), ..Default::default() }
    }
  }

  impl ReminderStore for FakeStore {
    type Error = std::io::Error;

    async fn initialize(&self) -> Result<(), Self::Error> { Ok(()) }

    async fn add(&self, _: &NewReminder) -> Result<i64, Self::Error> { unimplemented!() }

    async fn update(&self, _: i64, _: &NewReminder) -> Result<bool, Self::Error> {
      unimplemented!()
    }

    async fn delete(&self, _: i64) -> Result<bool, Self::Error> { unimplemented!() }

    async fn get(&self, _: i64) -> Result<Option<Reminder>, Self::Error> { unimplemented!() }

    async fn list_all(&self) -> Result<Vec<Reminder>, Self::Error> {
      Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_due(&self, stamp: &str) -> Result<Vec<String>, Self::Error> {
      self.queries.fetch_add(1, Ordering::SeqCst);
      if self.failing.load(Ordering::SeqCst) {
        return Err(std::io::Error::other("database is locked"));
      }
      Ok(
        self
          .rows
          .lock()
          .unwrap()
          .iter()
          .filter(|r| r.due_key() == stamp)
          .map(|r| r.name.clone())
          .collect(),
      )
    }
  }

  fn poller(
    store: Arc<FakeStore>,
    now: NaiveDateTime,
  ) -> Poller<FakeStore, RecordingSink, FixedClock> {
    Poller::new(store, Notifier::new(RecordingSink::default())).with_clock(FixedClock(now))
  }

  #[tokio::test]
  async fn check_once_notifies_each_due_reminder() {
    let store = Arc::new(FakeStore::with(&[
      ("Aspirin", "2025-06-01", "08:30 AM"),
      ("Vitamin D", "2025-06-01", "08:30 AM"),
      ("Evening", "2025-06-01", "08:30 PM"),
    ]));
    let p = poller(store, at(8, 30));

    assert_eq!(p.check_once().await.unwrap(), 2);
    assert_eq!(
      p.notifier().sink().bodies(),
      [
        "Time to take your medicine: Aspirin",
        "Time to take your medicine: Vitamin D",
      ]
    );
  }

  #[tokio::test]
  async fn check_once_outside_the_minute_notifies_nothing() {
    let store = Arc::new(FakeStore::with(&[("Aspirin", "2025-06-01", "08:30 AM")]));
    let p = poller(store, at(8, 31));

    assert_eq!(p.check_once().await.unwrap(), 0);
    assert!(p.notifier().sink().bodies().is_empty());
  }

  #[tokio::test]
  async fn every_cycle_in_the_same_minute_notifies_again() {
    let store = Arc::new(FakeStore::with(&[("Aspirin", "2025-06-01", "08:30 AM")]));
    let p = poller(store, at(8, 30));

    p.check_once().await.unwrap();
    p.check_once().await.unwrap();
    assert_eq!(p.notifier().sink().bodies().len(), 2);
  }

  #[tokio::test]
  async fn check_once_surfaces_store_failure() {
    let store = Arc::new(FakeStore::with(&[("Aspirin", "2025-06-01", "08:30 AM")]));
    store.failing.store(true, Ordering::SeqCst);
    let p = poller(store, at(8, 30));

    assert!(p.check_once().await.is_err());
    assert!(p.notifier().sink().bodies().is_empty());
  }

  #[tokio::test]
  async fn notification_failure_does_not_fail_the_cycle() {
    let store = Arc::new(FakeStore::with(&[("Aspirin", "2025-06-01", "08:30 AM")]));
    let p = Poller::new(store, Notifier::new(FailingSink)).with_clock(FixedClock(at(8, 30)));

    assert_eq!(p.check_once().await.unwrap(), 1);
  }

  #[tokio::test]
  async fn run_keeps_polling_through_store_failures_and_stops_on_cancel() {
    let store = Arc::new(FakeStore::with(&[("Aspirin", "2025-06-01", "08:30 AM")]));
    store.failing.store(true, Ordering::SeqCst);

    let shutdown = CancellationToken::new();
    let handle = poller(store.clone(), at(8, 30))
      .with_interval(Duration::from_millis(10))
      .spawn(shutdown.clone());

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle)
      .await
      .expect("poller should stop after cancel")
      .expect("poller task should not panic");

    assert!(store.queries.load(Ordering::SeqCst) >= 2);
  }

  #[tokio::test]
  async fn run_checks_immediately_on_start() {
    let store = Arc::new(FakeStore::with(&[]));
    let shutdown = CancellationToken::new();
    let handle = poller(store.clone(), at(8, 30))
      .with_interval(Duration::from_secs(3600))
      .spawn(shutdown.clone());

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    handle.await.unwrap();

    assert_eq!(store.queries.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn polls_a_real_sqlite_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("reminders.db")).await.unwrap();
    store
      .add(&NewReminder::parse("Aspirin", "2025-06-01", "8:30am").unwrap())
      .await
      .unwrap();

    let p = Poller::new(Arc::new(store), Notifier::new(RecordingSink::default()))
      .with_clock(FixedClock(at(8, 30)));

    assert_eq!(p.check_once().await.unwrap(), 1);
    assert_eq!(p.notifier().sink().bodies(), ["Time to take your medicine: Aspirin"]);
  }

  #[tokio::test]
  async fn sqlite_failure_skips_the_cycle_and_the_loop_continues() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(dir.path().join("reminders.db")).await.unwrap());
    drop(dir);

    let p = Poller::new(store, Notifier::new(RecordingSink::default()))
      .with_clock(FixedClock(at(8, 30)));
    assert!(matches!(
      p.check_once().await,
      Err(pillbox_store_sqlite::Error::Database(_))
    ));

    let shutdown = CancellationToken::new();
    let handle = p.with_interval(Duration::from_millis(10)).spawn(shutdown.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!handle.is_finished());

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
      .await
      .expect("poller should stop after cancel")
      .expect("poller task should not panic");
  }
}
