//! Runtime settings, layered from an optional TOML file and `PILLBOX_*`
//! environment variables.
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `PILLBOX_NOTIFICATION__BACKEND=log`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context as _, bail};
use pillbox_reminder::{CommandSink, LogSink, Notifier, Sink, notifier};
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite database file. A leading `~` is expanded.
  pub db_path:            PathBuf,
  pub poll_interval_secs: u64,
  pub notification:       NotificationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
  pub backend:      NotificationBackend,
  pub title:        String,
  pub timeout_secs: u64,
}

/// Where notifications go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationBackend {
  /// The desktop, via the platform notifier program.
  #[default]
  Command,
  /// The log only.
  Log,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      db_path:            PathBuf::from("medicine_reminder.db"),
      poll_interval_secs: pillbox_reminder::DEFAULT_POLL_INTERVAL.as_secs(),
      notification:       NotificationSettings::default(),
    }
  }
}

impl Default for NotificationSettings {
  fn default() -> Self {
    Self {
      backend:      NotificationBackend::default(),
      title:        notifier::DEFAULT_TITLE.to_owned(),
      timeout_secs: notifier::DEFAULT_TIMEOUT.as_secs(),
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings: Settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("PILLBOX")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    settings.validate()?;
    Ok(settings)
  }

  fn validate(&self) -> anyhow::Result<()> {
    if self.poll_interval_secs == 0 {
      bail!("poll_interval_secs must be greater than zero");
    }
    if self.db_path.as_os_str().is_empty() {
      bail!("db_path must not be empty");
    }
    Ok(())
  }

  pub fn poll_interval(&self) -> Duration { Duration::from_secs(self.poll_interval_secs) }

  /// The database path with a leading `~` resolved against `$HOME`.
  pub fn store_path(&self) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    expand_home(&self.db_path, home.as_deref())
  }
}

impl NotificationSettings {
  pub fn notifier(&self) -> Notifier<Sink> {
    let sink = match self.backend {
      NotificationBackend::Command => Sink::Command(CommandSink::default()),
      NotificationBackend::Log => Sink::Log(LogSink),
    };
    Notifier::new(sink)
      .with_title(&self.title)
      .with_timeout(Duration::from_secs(self.timeout_secs))
  }
}

/// Resolve a leading `~` component against `home`. Paths like `~user/x` are
/// not expanded, and nothing changes when there is no home directory.
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
  match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}
