//! Core types and trait definitions for Pillbox medicine reminders.
//!
//! This crate is free of database and notification dependencies. The store
//! backend and the reminder poller both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod reminder;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use reminder::{NewReminder, Reminder};
pub use store::ReminderStore;
