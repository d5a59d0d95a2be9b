mod input;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bdaycal_core::Settings;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bdaycal")]
#[command(about = "Sync each user's birthdays calendar with the birthdays in their address books")]
#[command(
    long_about = "Reads changed storage paths (collection-root/<user>/<collection>/<file>), one \
per line, and updates the birthdays calendar of every user they belong to.\n\n\
Settings come from the environment:\n  \
BIRTHDAY_REMINDER_AT_HOUR  add a reminder this many hours before each birthday\n  \
BIRTHDAY_CALENDAR_COLOR    color of newly created birthday calendars\n  \
BIRTHDAY_UID_MATCH         'substring' (default) or 'exact'\n  \
BIRTHDAY_STORAGE_DIR       directory the paths are relative to (default: .)"
)]
struct Cli {
    /// Files listing changed paths ("-" for stdin). Reads stdin if none are given.
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let settings = Settings::from_env().context("Invalid BIRTHDAY_* settings")?;
    let change_set = input::read_change_set(&cli.files)?;

    if change_set.is_empty() {
        tracing::debug!("no collection items changed");
        return Ok(());
    }

    let stats = bdaycal_core::run(&change_set, &settings, &mut rand::thread_rng())?;
    tracing::info!(
        created = stats.created,
        updated = stats.updated,
        deleted = stats.deleted,
        unchanged = stats.unchanged,
        "done"
    );

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default of warnings only.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
