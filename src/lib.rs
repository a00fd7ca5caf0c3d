pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod refresh;
pub mod remote;
pub mod tui;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{BuzzError, Result};
pub use remote::{BeeminderClient, GoalService};
pub use types::{BufferTier, Datapoint, Goal, GoalDetail, NewDatapoint, NewGoal};
