//! Tracing setup.
//!
//! Logs go to `buzz.log` in the data directory so the TUI screen is never
//! written over. Verbosity comes from `BUZZ_LOG` (default `buzz=info`).

use std::fs::{self, OpenOptions};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config;
use crate::error::Result;

pub const LOG_ENV: &str = "BUZZ_LOG";
const DEFAULT_FILTER: &str = "buzz=info";

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered lines are flushed.
pub fn init() -> Result<WorkerGuard> {
    let dir = config::data_dir()?;
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("buzz.log"))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // A second init (e.g. in tests) is not an error worth surfacing.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();

    Ok(guard)
}
