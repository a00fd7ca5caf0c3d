//! Top-level application configuration.
//!
//! Configuration is stored in `<config dir>/buzz/config.yaml` and includes:
//! - Beeminder username and personal auth token
//! - API endpoint and request timeout
//! - TUI refresh and inactivity settings

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{BuzzError, Result};

pub const DEFAULT_API_BASE: &str = "https://www.beeminder.com/api/v1";

const USERNAME_ENV: &str = "BEEMINDER_USERNAME";
const AUTH_TOKEN_ENV: &str = "BEEMINDER_AUTH_TOKEN";

/// Main configuration structure
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Beeminder username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Personal auth token from beeminder.com/api/v1/auth_token.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// API base URL (default: https://www.beeminder.com/api/v1)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Whether the TUI refreshes the goal list periodically
    #[serde(default = "default_true")]
    pub auto_refresh: bool,

    /// Seconds between periodic refreshes (default: 300)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Seconds of inactivity before the grid cursor is hidden (default: 3)
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_inactivity_timeout() -> u64 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            auth_token: None,
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout(),
            auto_refresh: true,
            refresh_interval_secs: default_refresh_interval(),
            inactivity_timeout_secs: default_inactivity_timeout(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("auto_refresh", &self.auto_refresh)
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("inactivity_timeout_secs", &self.inactivity_timeout_secs)
            .finish()
    }
}

/// Username and token pair, resolved from environment or config file
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub auth_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "buzz")
        .ok_or_else(|| BuzzError::Config("could not locate a home directory".to_string()))
}

/// Directory for runtime files (log, refresh flag)
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, or defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(BuzzError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(BuzzError::Config(
                "refresh_interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve credentials, preferring environment variables over the file
    pub fn credentials(&self) -> Result<Credentials> {
        let username = env_non_empty(USERNAME_ENV).or_else(|| self.username.clone());
        let auth_token = env_non_empty(AUTH_TOKEN_ENV).or_else(|| self.auth_token.clone());

        match (username, auth_token) {
            (Some(username), Some(auth_token)) => Ok(Credentials {
                username,
                auth_token,
            }),
            _ => Err(BuzzError::Auth(format!(
                "not logged in. Run `buzz auth <username> <token>` \
                 or set {USERNAME_ENV} and {AUTH_TOKEN_ENV}"
            ))),
        }
    }

    pub fn set_credentials(&mut self, username: String, auth_token: String) {
        self.username = Some(username);
        self.auth_token = Some(auth_token);
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
