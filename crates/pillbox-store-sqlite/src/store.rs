//! [`SqliteStore`] — the SQLite implementation of [`ReminderStore`].

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use rusqlite::OptionalExtension as _;

use pillbox_core::{NewReminder, Reminder, ReminderStore};

use crate::{Result, schema::SCHEMA};

/// How long a connection waits on another writer's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_REMINDER: &str = "SELECT id, name, date, time FROM medicines";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A reminder store backed by a single SQLite file.
///
/// Holds only the file path; every operation connects, runs, and closes.
/// Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self { path: path.as_ref().to_path_buf() };
    store.initialize().await?;
    Ok(store)
  }

  /// The database file this store reads and writes.
  pub fn path(&self) -> &Path { &self.path }

  /// Run `op` on a fresh connection, then close it.
  ///
  /// Writes rely on SQLite's implicit per-statement transaction; nothing
  /// spans two calls.
  async fn with_connection<T, F>(&self, op: F) -> Result<T>
  where
    F: FnOnce(&mut rusqlite::Connection) -> Result<T, tokio_rusqlite::Error>
      + Send
      + 'static,
    T: Send + 'static,
  {
    let conn = tokio_rusqlite::Connection::open(&self.path).await?;

    let result = conn
      .call(move |conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        op(conn)
      })
      .await;

    if let Err(error) = conn.close().await {
      tracing::warn!(path = %self.path.display(), %error, "failed to close database connection");
    }

    Ok(result?)
  }
}

fn reminder_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reminder> {
  Ok(Reminder {
    id:   row.get(0)?,
    name: row.get(1)?,
    date: row.get(2)?,
    time: row.get(3)?,
  })
}

// ─── ReminderStore impl ──────────────────────────────────────────────────────

impl ReminderStore for SqliteStore {
  type Error = crate::Error;

  async fn initialize(&self) -> Result<()> {
    self
      .with_connection(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn add(&self, input: &NewReminder) -> Result<i64> {
    let name = input.name().to_owned();
    let date = input.date().to_owned();
    let time = input.time().to_owned();

    let id = self
      .with_connection(move |conn| {
        conn.execute(
          "INSERT INTO medicines (name, date, time) VALUES (?1, ?2, ?3)",
          rusqlite::params![name, date, time],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, name = input.name(), "reminder added");
    Ok(id)
  }

  async fn update(&self, id: i64, input: &NewReminder) -> Result<bool> {
    let name = input.name().to_owned();
    let date = input.date().to_owned();
    let time = input.time().to_owned();

    let changed = self
      .with_connection(move |conn| {
        Ok(conn.execute(
          "UPDATE medicines SET name = ?1, date = ?2, time = ?3 WHERE id = ?4",
          rusqlite::params![name, date, time, id],
        )?)
      })
      .await?;

    tracing::debug!(id, changed, "reminder update");
    Ok(changed > 0)
  }

  async fn delete(&self, id: i64) -> Result<bool> {
    let changed = self
      .with_connection(move |conn| {
        Ok(conn.execute("DELETE FROM medicines WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    tracing::debug!(id, changed, "reminder delete");
    Ok(changed > 0)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get(&self, id: i64) -> Result<Option<Reminder>> {
    self
      .with_connection(move |conn| {
        Ok(conn
          .query_row(
            &format!("{SELECT_REMINDER} WHERE id = ?1"),
            rusqlite::params![id],
            reminder_from_row,
          )
          .optional()?)
      })
      .await
  }

  async fn list_all(&self) -> Result<Vec<Reminder>> {
    self
      .with_connection(|conn| {
        let mut stmt = conn.prepare(&format!("{SELECT_REMINDER} ORDER BY date, time, id"))?;
        let rows = stmt
          .query_map([], reminder_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
  }

  async fn find_due(&self, stamp: &str) -> Result<Vec<String>> {
    let stamp = stamp.to_owned();

    self
      .with_connection(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT name FROM medicines WHERE date || ' ' || time = ?1 ORDER BY id",
        )?;
        let names = stmt
          .query_map(rusqlite::params![stamp], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await
  }
}
