use std::time::Duration;

use owo_colors::OwoColorize;

use super::runtime;
use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::remote::BeeminderClient;

/// Verify and store Beeminder credentials (`buzz auth`)
pub fn cmd_auth(username: &str, auth_token: &str) -> Result<()> {
    let mut config = Config::load()?;
    let client = BeeminderClient::new(
        &config.api_base,
        Credentials {
            username: username.to_string(),
            auth_token: auth_token.to_string(),
        },
        Duration::from_secs(config.request_timeout_secs),
    )?;

    runtime()?.block_on(client.verify())?;

    config.set_credentials(username.to_string(), auth_token.to_string());
    config.save()?;
    tracing::info!(user = username, "credentials saved");

    println!(
        "{} Logged in as {}; credentials saved to {}",
        "✓".green(),
        username.cyan(),
        Config::config_path()?.display()
    );
    Ok(())
}
