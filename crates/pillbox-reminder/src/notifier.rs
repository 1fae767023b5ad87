//! Best-effort desktop notifications.
//!
//! A [`NotificationSink`] is the platform capability: it either shows a
//! notification or reports why it could not. [`Notifier`] wraps a sink with
//! the reminder wording and swallows every failure after logging it.

use std::{future::Future, process::Stdio, time::Duration};

use tokio::process::Command;

use crate::error::NotificationError;

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "Medicine Reminder";

/// How long a notification stays on screen when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One notification, ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub title:   String,
  pub body:    String,
  pub timeout: Duration,
}

// ─── Sinks ───────────────────────────────────────────────────────────────────

/// A platform notification capability.
pub trait NotificationSink: Send + Sync {
  fn show<'a>(
    &'a self,
    notification: &'a Notification,
  ) -> impl Future<Output = Result<(), NotificationError>> + Send + 'a;
}

/// Shows notifications by running the platform's notifier program:
/// `notify-send` on Linux and the BSDs, `osascript` on macOS.
#[derive(Debug, Clone)]
pub struct CommandSink {
  app_name: String,
}

impl CommandSink {
  pub fn new(app_name: impl Into<String>) -> Self { Self { app_name: app_name.into() } }
}

impl Default for CommandSink {
  fn default() -> Self { Self::new("pillbox") }
}

impl NotificationSink for CommandSink {
  async fn show(&self, notification: &Notification) -> Result<(), NotificationError> {
    let (program, mut command) = platform_command(&self.app_name, notification)?;

    let output = command
      .stdin(Stdio::null())
      .kill_on_drop(true)
      .output()
      .await
      .map_err(|source| NotificationError::Spawn { program, source })?;

    if !output.status.success() {
      return Err(NotificationError::Failed {
        program,
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
      });
    }
    Ok(())
  }
}

#[cfg(target_os = "macos")]
fn platform_command(
  _app_name:    &str,
  notification: &Notification,
) -> Result<(&'static str, Command), NotificationError> {
  let script = format!(
    "display notification {} with title {}",
    applescript_string(&notification.body),
    applescript_string(&notification.title),
  );
  let mut command = Command::new("osascript");
  command.arg("-e").arg(script);
  Ok(("osascript", command))
}

#[cfg(windows)]
fn platform_command(
  _app_name:     &str,
  _notification: &Notification,
) -> Result<(&'static str, Command), NotificationError> {
  Err(NotificationError::Unsupported)
}

#[cfg(not(any(target_os = "macos", windows)))]
fn platform_command(
  app_name:     &str,
  notification: &Notification,
) -> Result<(&'static str, Command), NotificationError> {
  let mut command = Command::new("notify-send");
  command
    .arg(format!("--app-name={app_name}"))
    .arg(format!("--expire-time={}", notification.timeout.as_millis()))
    .arg("--")
    .arg(&notification.title)
    .arg(&notification.body);
  Ok(("notify-send", command))
}

/// Quote `s` as an AppleScript string literal.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript_string(s: &str) -> String {
  let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
  format!("\"{escaped}\"")
}

/// Writes notifications to the log instead of the desktop. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
  async fn show(&self, notification: &Notification) -> Result<(), NotificationError> {
    tracing::info!(title = %notification.title, "{}", notification.body);
    Ok(())
  }
}

/// A sink chosen at runtime.
#[derive(Debug, Clone)]
pub enum Sink {
  Command(CommandSink),
  Log(LogSink),
}

impl NotificationSink for Sink {
  async fn show(&self, notification: &Notification) -> Result<(), NotificationError> {
    match self {
      Sink::Command(sink) => sink.show(notification).await,
      Sink::Log(sink) => sink.show(notification).await,
    }
  }
}

// ─── Notifier ────────────────────────────────────────────────────────────────

/// Fire-and-forget reminder notifications.
#[derive(Debug, Clone)]
pub struct Notifier<K> {
  sink:    K,
  title:   String,
  timeout: Duration,
}

impl<K: NotificationSink> Notifier<K> {
  pub fn new(sink: K) -> Self {
    Self { sink, title: DEFAULT_TITLE.to_owned(), timeout: DEFAULT_TIMEOUT }
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = title.into();
    self
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn sink(&self) -> &K { &self.sink }

  /// The notification shown for `medicine_name`.
  pub fn message(&self, medicine_name: &str) -> Notification {
    Notification {
      title:   self.title.clone(),
      body:    format!("Time to take your medicine: {medicine_name}"),
      timeout: self.timeout,
    }
  }

  /// Show a reminder for `medicine_name`.
  ///
  /// Failures are logged together with a plain-text fallback line and never
  /// returned.
  pub async fn notify(&self, medicine_name: &str) {
    let notification = self.message(medicine_name);
    if let Err(error) = self.sink.show(&notification).await {
      tracing::warn!(%error, medicine = medicine_name, "failed to deliver notification");
      tracing::warn!("REMINDER: {medicine_name} is due now!");
    }
  }
}
