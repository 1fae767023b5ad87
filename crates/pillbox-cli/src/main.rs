//! `pillbox` — medicine reminders with desktop notifications.
//!
//! # Usage
//!
//! ```text
//! pillbox add Aspirin --date 2025-06-01 --time "8:30 AM"
//! pillbox list
//! pillbox watch
//! ```
//!
//! Settings come from `pillbox.toml` (or `--config`) and `PILLBOX_*`
//! environment variables; see [`settings::Settings`].

mod commands;
mod settings;

use std::{io, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pillbox_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "pillbox", author, version, about = "Medicine reminders with desktop notifications")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "pillbox.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `db_path` from the config.
  #[arg(long, global = true, value_name = "FILE")]
  db: Option<PathBuf>,

  /// Log at debug level unless `RUST_LOG` says otherwise.
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Record a new medicine reminder.
  Add {
    name: String,
    /// Day the reminder is due (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date: Option<String>,
    /// Time the reminder is due, 12-hour clock (e.g. "08:30 AM").
    #[arg(long)]
    time: String,
  },

  /// Rewrite the name, date and time of an existing reminder.
  Update {
    id:   i64,
    name: String,
    /// New day (YYYY-MM-DD); keeps the stored date when omitted.
    #[arg(long)]
    date: Option<String>,
    /// New time, 12-hour clock (e.g. "08:30 AM").
    #[arg(long)]
    time: String,
  },

  /// Delete a reminder.
  Delete { id: i64 },

  /// Show every reminder.
  List {
    /// Sort by clock time instead of stored text.
    #[arg(long)]
    chronological: bool,
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
  },

  /// Check for due reminders once and exit.
  Due {
    /// Check this minute instead of now (YYYY-MM-DD HH:MM AM/PM).
    #[arg(long, value_name = "STAMP")]
    at: Option<String>,
  },

  /// Keep checking for due reminders until interrupted.
  Watch,
}

// ─── Logging ──────────────────────────────────────────────────────────────────

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
  let default = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy(),
    )
    .with_target(verbose)
    .with_writer(io::stderr)
    .init();
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let mut settings = Settings::load(&cli.config)
    .with_context(|| format!("failed to load settings from {:?}", cli.config))?;
  if let Some(db) = cli.db {
    settings.db_path = db;
  }

  let store_path = settings.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let mut out = io::stdout();

  match cli.command {
    Command::Add { name, date, time } => {
      let date = date.unwrap_or_else(commands::today);
      commands::add(&store, &mut out, &name, &date, &time).await?;
    }
    Command::Update { id, name, date, time } => {
      commands::update(&store, &mut out, id, &name, date.as_deref(), &time).await?;
    }
    Command::Delete { id } => {
      commands::delete(&store, &mut out, id).await?;
    }
    Command::List { chronological, json } => {
      commands::list(&store, &mut out, chronological, json).await?;
    }
    Command::Due { at } => {
      let notifier = settings.notification.notifier();
      commands::due(Arc::new(store), notifier, &mut out, at.as_deref()).await?;
    }
    Command::Watch => {
      let notifier = settings.notification.notifier();
      tracing::info!(db = %store_path.display(), "watching for due reminders");
      commands::watch(Arc::new(store), notifier, settings.poll_interval()).await?;
    }
  }

  Ok(())
}
