//! Error types for `pillbox-core`.
//!
//! Every variant is a validation failure: bad user input caught before any
//! store call is made.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("medicine name must not be empty")]
  EmptyName,

  #[error("invalid date {0:?}: expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("invalid time {0:?}: expected HH:MM AM/PM")]
  InvalidTime(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
