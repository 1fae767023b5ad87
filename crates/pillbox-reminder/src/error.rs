//! Error type for notification delivery.
//!
//! These never propagate past [`Notifier`](crate::Notifier); they exist so
//! sinks can report what went wrong for the log.

use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: &'static str,
    #[source]
    source:  std::io::Error,
  },

  #[error("{program} exited with {status}: {stderr}")]
  Failed {
    program: &'static str,
    status:  ExitStatus,
    stderr:  String,
  },

  #[error("desktop notifications are not supported on this platform")]
  Unsupported,
}
