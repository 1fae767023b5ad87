//! Due-reminder detection and desktop notification for Pillbox.
//!
//! A [`Poller`] wakes on a fixed interval, asks any
//! [`ReminderStore`](pillbox_core::ReminderStore) for reminders due this
//! minute, and hands each one to a [`Notifier`]. Notification failures never
//! reach the poller.

#![allow(async_fn_in_trait)]

pub mod clock;
pub mod error;
pub mod notifier;
pub mod poller;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::NotificationError;
pub use notifier::{CommandSink, LogSink, Notification, NotificationSink, Notifier, Sink};
pub use poller::{DEFAULT_POLL_INTERVAL, Poller};
