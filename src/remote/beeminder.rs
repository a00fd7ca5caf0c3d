//! Beeminder API v1 client.
//!
//! Security: the auth token is held in a [`SecretBox`] and only exposed while
//! building a request's query string, so it never shows up in `Debug` output.

use std::fmt;
use std::time::Duration;

use jiff::civil::Date;
use jiff::tz::TimeZone;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::{GoalService, sort_goals};
use crate::config::{Config, Credentials};
use crate::error::{BuzzError, Result};
use crate::types::{Goal, GoalDetail, NewDatapoint, NewGoal};

/// Beeminder HTTP client bound to one user
pub struct BeeminderClient {
    client: Client,
    base_url: String,
    username: String,
    auth_token: SecretBox<String>,
}

impl fmt::Debug for BeeminderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeeminderClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    username: String,
}

impl BeeminderClient {
    /// Create a client from configuration, resolving credentials from the
    /// environment or the config file.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.credentials()?;
        Self::new(
            &config.api_base,
            credentials,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Create a client for an explicit endpoint and credentials.
    ///
    /// The connect timeout is capped at 10s; `timeout` bounds the whole
    /// request.
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(concat!("buzz/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: credentials.username,
            auth_token: SecretBox::new(Box::new(credentials.auth_token)),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    fn user_url(&self, path: &str) -> String {
        format!("{}/users/{}{}", self.base_url, self.username, path)
    }

    fn token_param(&self) -> (&'static str, &str) {
        ("auth_token", self.auth_token.expose_secret().as_str())
    }

    /// Check that the username/token pair is accepted by the service.
    pub async fn verify(&self) -> Result<()> {
        let response = self
            .client
            .get(self.user_url(".json"))
            .query(&[self.token_param()])
            .send()
            .await?;
        let user: UserInfo = decode(response).await?;

        if !user.username.eq_ignore_ascii_case(&self.username) {
            return Err(BuzzError::Auth(format!(
                "token belongs to '{}', not '{}'",
                user.username, self.username
            )));
        }
        Ok(())
    }
}

/// Turn a response into `T`, or an [`ApiError`] carrying the status.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Beeminder request failed");
        return Err(ApiError::from_body(status, &body).into());
    }
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

async fn expect_success(response: Response) -> Result<()> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Beeminder request failed");
        return Err(ApiError::from_body(status, &body).into());
    }
    Ok(())
}

/// Goal dates are sent as the end of that day in the local time zone.
fn goal_date_seconds(date: Date) -> Result<i64> {
    let zoned = date
        .at(23, 59, 59, 0)
        .to_zoned(TimeZone::system())
        .map_err(|e| BuzzError::InvalidDate(format!("{date}: {e}")))?;
    Ok(zoned.timestamp().as_second())
}

impl GoalService for BeeminderClient {
    async fn fetch_goals(&self) -> Result<Vec<Goal>> {
        tracing::debug!(user = %self.username, "fetching goals");
        let response = self
            .client
            .get(self.user_url("/goals.json"))
            .query(&[self.token_param()])
            .send()
            .await?;
        let mut goals: Vec<Goal> = decode(response).await?;
        sort_goals(&mut goals);
        Ok(goals)
    }

    async fn fetch_goal(&self, slug: &str) -> Result<GoalDetail> {
        tracing::debug!(slug, "fetching goal detail");
        let response = self
            .client
            .get(self.user_url(&format!("/goals/{slug}.json")))
            .query(&[self.token_param(), ("datapoints", "true")])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(BuzzError::GoalNotFound(slug.to_string()));
        }
        decode(response).await
    }

    async fn submit_datapoint(&self, slug: &str, datapoint: NewDatapoint) -> Result<()> {
        tracing::info!(slug, value = datapoint.value, "submitting datapoint");
        let value = datapoint.value.to_string();
        let daystamp = datapoint.daystamp();
        let response = self
            .client
            .post(self.user_url(&format!("/goals/{slug}/datapoints.json")))
            .form(&[
                self.token_param(),
                ("value", value.as_str()),
                ("daystamp", daystamp.as_str()),
                ("comment", datapoint.comment.as_str()),
            ])
            .send()
            .await?;
        expect_success(response).await
    }

    async fn create_goal(&self, goal: NewGoal) -> Result<Goal> {
        tracing::info!(slug = %goal.slug, "creating goal");
        let (key, token) = self.token_param();
        let mut params: Vec<(&str, String)> = vec![
            (key, token.to_string()),
            ("slug", goal.slug),
            ("title", goal.title),
            ("goal_type", goal.goal_type),
            ("gunits", goal.gunits),
            ("runits", goal.runits),
        ];
        // Exactly two of the three are set; the server derives the third.
        if let Some(date) = goal.goaldate {
            params.push(("goaldate", goal_date_seconds(date)?.to_string()));
        }
        if let Some(goalval) = goal.goalval {
            params.push(("goalval", goalval.to_string()));
        }
        if let Some(rate) = goal.rate {
            params.push(("rate", rate.to_string()));
        }

        let response = self
            .client
            .post(self.user_url("/goals.json"))
            .form(&params)
            .send()
            .await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BeeminderClient {
        BeeminderClient::new(
            "https://example.test/api/v1/",
            Credentials {
                username: "alice".to_string(),
                auth_token: "very-secret".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_user_url_strips_trailing_slash() {
        let client = client();
        assert_eq!(
            client.user_url("/goals.json"),
            "https://example.test/api/v1/users/alice/goals.json"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_goal_date_is_end_of_local_day() {
        let secs = goal_date_seconds(jiff::civil::date(2026, 6, 1)).unwrap();
        let zoned = jiff::Timestamp::from_second(secs)
            .unwrap()
            .to_zoned(TimeZone::system());
        assert_eq!(zoned.date(), jiff::civil::date(2026, 6, 1));
        assert_eq!(zoned.hour(), 23);
    }
}
