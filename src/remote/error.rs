//! Error type for failed Beeminder API calls.
//!
//! Keeps the HTTP status next to the server's message so callers can tell an
//! authentication failure from a missing goal or a server outage.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::BuzzError;

/// API error with optional HTTP status.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if available
    pub status: Option<StatusCode>,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build an error from a non-success response body.
    ///
    /// Beeminder reports failures as `{"errors": ...}` where the value is a
    /// string, a list of strings, or an object keyed by field.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("errors").map(flatten_errors))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });
        Self::with_status(message, status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(StatusCode::NOT_FOUND)
    }
}

fn flatten_errors(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(flatten_errors)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(map) => map
            .iter()
            .map(|(field, v)| format!("{field}: {}", flatten_errors(v)))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({})", self.message, status.as_u16()),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<ApiError> for BuzzError {
    fn from(error: ApiError) -> Self {
        if error.is_unauthorized() {
            return BuzzError::Auth("invalid username or auth token".to_string());
        }
        BuzzError::Api(error.to_string())
    }
}
