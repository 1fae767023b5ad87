//! Subcommand implementations.
//!
//! Each command validates its input before touching the store, and writes
//! user-facing output to `out` so it can be captured in tests.

use std::{io::Write, sync::Arc, time::Duration};

use anyhow::{Context as _, Result, anyhow};
use chrono::Local;
use pillbox_core::{
  NewReminder, Reminder, ReminderStore,
  reminder::sort_chronologically,
  time::{DATE_FORMAT, parse_due_stamp},
};
use pillbox_reminder::{FixedClock, NotificationSink, Notifier, Poller};
use tokio_util::sync::CancellationToken;

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String { Local::now().date_naive().format(DATE_FORMAT).to_string() }

// ─── Writes ───────────────────────────────────────────────────────────────────

pub async fn add<S: ReminderStore>(
  store: &S,
  out:   &mut impl Write,
  name:  &str,
  date:  &str,
  time:  &str,
) -> Result<i64> {
  let input = NewReminder::parse(name, date, time)?;
  let id = store.add(&input).await.context("could not add medicine")?;

  writeln!(
    out,
    "Added reminder #{id}: {} on {} at {}",
    input.name(),
    input.date(),
    input.time()
  )?;
  Ok(id)
}

/// Returns `false` when `id` did not exist; that is reported, not an error.
/// Without `date` the reminder keeps the date it already has.
pub async fn update<S: ReminderStore>(
  store: &S,
  out:   &mut impl Write,
  id:    i64,
  name:  &str,
  date:  Option<&str>,
  time:  &str,
) -> Result<bool> {
  let date = match date {
    Some(date) => date.to_owned(),
    None => match store
      .get(id)
      .await
      .with_context(|| format!("could not read reminder #{id}"))?
    {
      Some(row) => row.date,
      None => {
        // Bad input is still an error when there is nothing to update.
        NewReminder::parse(name, &today(), time)?;
        writeln!(out, "No reminder #{id}; nothing updated")?;
        return Ok(false);
      }
    },
  };

  let input = NewReminder::parse(name, &date, time)?;
  let found = store
    .update(id, &input)
    .await
    .with_context(|| format!("could not update reminder #{id}"))?;

  if found {
    writeln!(out, "Updated reminder #{id}")?;
  } else {
    writeln!(out, "No reminder #{id}; nothing updated")?;
  }
  Ok(found)
}

pub async fn delete<S: ReminderStore>(store: &S, out: &mut impl Write, id: i64) -> Result<bool> {
  let found = store
    .delete(id)
    .await
    .with_context(|| format!("could not delete reminder #{id}"))?;

  if found {
    writeln!(out, "Deleted reminder #{id}")?;
  } else {
    writeln!(out, "No reminder #{id}; nothing deleted")?;
  }
  Ok(found)
}

// ─── Reads ────────────────────────────────────────────────────────────────────

pub async fn list<S: ReminderStore>(
  store:         &S,
  out:           &mut impl Write,
  chronological: bool,
  json:          bool,
) -> Result<()> {
  let mut reminders = store.list_all().await.context("could not list reminders")?;
  if chronological {
    sort_chronologically(&mut reminders);
  }

  if json {
    serde_json::to_writer_pretty(&mut *out, &reminders)?;
    writeln!(out)?;
  } else {
    write_table(out, &reminders)?;
  }
  Ok(())
}

fn write_table(out: &mut impl Write, reminders: &[Reminder]) -> std::io::Result<()> {
  if reminders.is_empty() {
    return writeln!(out, "No reminders.");
  }

  let id_width = reminders
    .iter()
    .map(|r| r.id.to_string().len())
    .max()
    .unwrap_or(0)
    .max("ID".len());
  let name_width = reminders
    .iter()
    .map(|r| r.name.chars().count())
    .max()
    .unwrap_or(0)
    .max("Medicine".len());

  writeln!(out, "{:>id_width$}  {:<name_width$}  {:<10}  Time", "ID", "Medicine", "Date")?;
  for r in reminders {
    writeln!(
      out,
      "{:>id_width$}  {:<name_width$}  {:<10}  {}",
      r.id, r.name, r.date, r.time
    )?;
  }
  Ok(())
}

// ─── Polling ──────────────────────────────────────────────────────────────────

/// Run one due check, either for the current minute or for the stamp in `at`
/// (`YYYY-MM-DD HH:MM AM/PM`).
pub async fn due<S, K>(
  store:    Arc<S>,
  notifier: Notifier<K>,
  out:      &mut impl Write,
  at:       Option<&str>,
) -> Result<usize>
where
  S: ReminderStore,
  K: NotificationSink,
{
  let poller = Poller::new(store, notifier);
  let count = match at {
    Some(stamp) => {
      let at = parse_due_stamp(stamp)
        .ok_or_else(|| anyhow!("invalid time {stamp:?}: expected YYYY-MM-DD HH:MM AM/PM"))?;
      poller.with_clock(FixedClock(at)).check_once().await
    }
    None => poller.check_once().await,
  }
  .context("due check failed")?;

  writeln!(out, "{count} reminder(s) due")?;
  Ok(count)
}

/// Run the poller in the background until Ctrl-C, then stop it and wait for
/// it to finish.
pub async fn watch<S, K>(store: Arc<S>, notifier: Notifier<K>, interval: Duration) -> Result<()>
where
  S: ReminderStore + 'static,
  K: NotificationSink + 'static,
{
  let shutdown = CancellationToken::new();
  let poller = Poller::new(store, notifier)
    .with_interval(interval)
    .spawn(shutdown.clone());

  let signal = tokio::signal::ctrl_c().await;
  tracing::info!("shutting down");
  shutdown.cancel();

  poller.await.context("poller task failed")?;
  signal.context("failed to listen for Ctrl-C")?;
  Ok(())
}
