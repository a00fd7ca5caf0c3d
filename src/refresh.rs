//! Cross-process refresh signaling.
//!
//! `buzz refresh` (or a successful `buzz add`) drops a flag file; a running
//! TUI polls for it, deletes it and reloads its goal list.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config;
use crate::error::Result;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

const FLAG_FILE: &str = "refresh-flag";

/// Location of the flag in the default data directory.
pub fn flag_path() -> Result<PathBuf> {
    Ok(config::data_dir()?.join(FLAG_FILE))
}

/// Ask any running session to refresh.
pub fn request(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, jiff::Timestamp::now().to_string())?;
    tracing::debug!(path = %path.display(), "refresh requested");
    Ok(())
}

/// Consume a pending request. Returns true if one was present.
pub fn take(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Poll `path` forever, calling `on_request` each time a flag is consumed.
/// Stops when `on_request` returns false.
pub async fn watch<F>(path: PathBuf, interval: Duration, mut on_request: F)
where
    F: FnMut() -> bool,
{
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        match take(&path) {
            Ok(true) => {
                if !on_request() {
                    return;
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "could not read refresh flag"),
        }
    }
}
