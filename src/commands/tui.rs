//! Goal browser command (bare `buzz`)
//!
//! Provides the interactive grid of goals with search, goal detail and
//! datapoint/goal entry.

use std::sync::Arc;

use iocraft::prelude::*;

use super::runtime;
use crate::config::Config;
use crate::error::{BuzzError, Result};
use crate::refresh;
use crate::remote::BeeminderClient;
use crate::tui::{GoalBrowser, SessionSettings, Viewport};

/// Launch the goal browser TUI
pub fn cmd_tui() -> Result<()> {
    let config = Config::load()?;
    let client = Arc::new(BeeminderClient::from_config(&config)?);
    // The component replaces this with the real terminal size on mount.
    let settings = SessionSettings::from_config(&config, Viewport::default());
    let refresh_flag = refresh::flag_path()?;
    tracing::info!(user = client.username(), "starting goal browser");

    runtime()?.block_on(async {
        element!(GoalBrowser(
            client: Some(client),
            settings: Some(settings),
            refresh_flag: Some(refresh_flag),
        ))
        .fullscreen()
        .await
        .map_err(|e| BuzzError::Other(format!("TUI error: {}", e)))
    })
}
