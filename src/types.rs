//! Domain types shared by the API client, the report commands and the TUI.

use std::fmt;

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Deserializer};

/// Default comment attached to datapoints entered through buzz
pub const DEFAULT_COMMENT: &str = "Added via buzz";

/// Datapoint value used when no previous value is known
pub const DEFAULT_DATAPOINT_VALUE: &str = "1";

/// Read-only projection of a Beeminder goal
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Goal {
    /// Goal identifier, unique per user
    pub slug: String,
    /// Human-readable title
    #[serde(default)]
    pub title: String,
    /// Amount pledged (the stake), in dollars
    #[serde(default)]
    pub pledge: f64,
    /// Safety buffer in days
    #[serde(default)]
    pub safebuf: i64,
    /// Instant at which the goal derails
    #[serde(deserialize_with = "unix_seconds")]
    pub losedate: Timestamp,
    /// Summary of what is needed and by when, e.g. "+2 in 3 days"
    #[serde(default)]
    pub limsum: String,
    /// Bare minimum needed to stay on track today
    #[serde(default)]
    pub baremin: String,
    /// Goal units
    #[serde(default)]
    pub gunits: String,
    /// Beeminder goal type (hustler, biker, ...)
    #[serde(default)]
    pub goal_type: String,
    /// Rate of the bright red line
    #[serde(default)]
    pub rate: Option<f64>,
    /// Units of the rate (d, w, m, y)
    #[serde(default)]
    pub runits: String,
}

impl Goal {
    pub fn tier(&self) -> BufferTier {
        BufferTier::from_safebuf(self.safebuf)
    }
}

/// A single datapoint on a goal
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Datapoint {
    pub id: String,
    pub value: f64,
    #[serde(default)]
    pub comment: String,
    /// Day the datapoint counts towards, formatted YYYYMMDD
    #[serde(default)]
    pub daystamp: String,
}

/// A goal together with its recent datapoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoalDetail {
    #[serde(flatten)]
    pub goal: Goal,
    #[serde(default)]
    pub datapoints: Vec<Datapoint>,
}

impl GoalDetail {
    /// Value of the most recent datapoint, if any
    pub fn last_value(&self) -> Option<f64> {
        self.datapoints
            .iter()
            .max_by(|a, b| a.daystamp.cmp(&b.daystamp))
            .map(|dp| dp.value)
    }
}

/// Datapoint ready to be sent to the API
#[derive(Debug, Clone, PartialEq)]
pub struct NewDatapoint {
    pub date: Date,
    pub value: f64,
    pub comment: String,
}

impl NewDatapoint {
    /// The API's daystamp format
    pub fn daystamp(&self) -> String {
        self.date.strftime("%Y%m%d").to_string()
    }
}

/// Parameters for creating a goal. Exactly two of the three scheduling
/// fields are set.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub slug: String,
    pub title: String,
    pub goal_type: String,
    pub gunits: String,
    pub goaldate: Option<Date>,
    pub goalval: Option<f64>,
    pub rate: Option<f64>,
    pub runits: String,
}

/// Severity tier derived from the safety buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BufferTier {
    Critical,
    Warning,
    Caution,
    Safe,
    Relaxed,
}

impl BufferTier {
    pub fn from_safebuf(safebuf: i64) -> Self {
        match safebuf {
            i64::MIN..=0 => BufferTier::Critical,
            1 => BufferTier::Warning,
            2 => BufferTier::Caution,
            3..=6 => BufferTier::Safe,
            _ => BufferTier::Relaxed,
        }
    }
}

impl fmt::Display for BufferTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BufferTier::Critical => "critical",
            BufferTier::Warning => "warning",
            BufferTier::Caution => "caution",
            BufferTier::Safe => "safe",
            BufferTier::Relaxed => "relaxed",
        };
        write!(f, "{label}")
    }
}

fn unix_seconds<'de, D>(deserializer: D) -> std::result::Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = i64::deserialize(deserializer)?;
    Timestamp::from_second(secs).map_err(serde::de::Error::custom)
}
