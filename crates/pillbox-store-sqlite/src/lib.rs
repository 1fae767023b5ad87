//! SQLite backend for the Pillbox reminder store.
//!
//! Every operation opens its own [`tokio_rusqlite`] connection, runs one
//! statement on that connection's worker thread, and closes it again. Nothing
//! is held open between calls, so the store can be shared freely between the
//! command-line front end and the background poller.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
