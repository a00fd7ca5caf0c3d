mod add;
mod auth;
mod refresh;
mod report;
mod tui;
mod view;

pub use add::cmd_add;
pub use auth::cmd_auth;
pub use refresh::cmd_refresh;
pub use report::{
    DueWindow, cmd_due, cmd_list, cmd_next, cmd_today, cmd_tomorrow, due_within, goal_to_json,
};
pub use tui::cmd_tui;
pub use view::cmd_view;

use owo_colors::OwoColorize;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::{BuzzError, Result};
use crate::remote::BeeminderClient;
use crate::types::BufferTier;

/// Runtime for one command invocation
pub(crate) fn runtime() -> Result<Runtime> {
    Runtime::new().map_err(|e| BuzzError::Other(format!("Failed to create runtime: {}", e)))
}

/// Client for the configured account
pub(crate) fn connect() -> Result<BeeminderClient> {
    let config = Config::load()?;
    BeeminderClient::from_config(&config)
}

/// Color `text` by buffer tier, matching the TUI grid colors
pub fn tier_colored(text: &str, tier: BufferTier) -> String {
    match tier {
        BufferTier::Critical => text.red().to_string(),
        BufferTier::Warning => text.truecolor(255, 165, 0).to_string(),
        BufferTier::Caution => text.blue().to_string(),
        BufferTier::Safe => text.green().to_string(),
        BufferTier::Relaxed => text.dimmed().to_string(),
    }
}

pub(crate) fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
