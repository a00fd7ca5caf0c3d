//! Access to the Beeminder service.
//!
//! The interactive session and the report commands talk to the service only
//! through [`GoalService`], so tests can substitute an in-memory fake.

pub mod beeminder;
pub mod error;

use std::cmp::Ordering;
use std::future::Future;

pub use beeminder::BeeminderClient;
pub use error::ApiError;

use crate::error::Result;
use crate::types::{DEFAULT_DATAPOINT_VALUE, Goal, GoalDetail, NewDatapoint, NewGoal};

/// Common interface for goal storage backends
pub trait GoalService: Send + Sync {
    /// Fetch all goals, ordered by [`compare_goals`]
    fn fetch_goals(&self) -> impl Future<Output = Result<Vec<Goal>>> + Send;

    /// Fetch one goal along with its recent datapoints
    fn fetch_goal(&self, slug: &str) -> impl Future<Output = Result<GoalDetail>> + Send;

    /// Add a datapoint to a goal
    fn submit_datapoint(
        &self,
        slug: &str,
        datapoint: NewDatapoint,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Create a new goal
    fn create_goal(&self, goal: NewGoal) -> impl Future<Output = Result<Goal>> + Send;
}

/// Server list order: soonest derailment first, then larger stake, then slug.
pub fn compare_goals(a: &Goal, b: &Goal) -> Ordering {
    a.losedate
        .cmp(&b.losedate)
        .then_with(|| b.pledge.total_cmp(&a.pledge))
        .then_with(|| a.slug.cmp(&b.slug))
}

pub fn sort_goals(goals: &mut [Goal]) {
    goals.sort_by(compare_goals);
}

/// Value to prefill when entering a datapoint: the latest known one, if any.
pub fn last_value_or_default(detail: Option<&GoalDetail>) -> String {
    detail
        .and_then(GoalDetail::last_value)
        .map(format_value)
        .unwrap_or_else(|| DEFAULT_DATAPOINT_VALUE.to_string())
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Datapoint;
    use jiff::Timestamp;

    fn goal(slug: &str, losedate: i64, pledge: f64) -> Goal {
        Goal {
            slug: slug.to_string(),
            title: String::new(),
            pledge,
            safebuf: 1,
            losedate: Timestamp::from_second(losedate).unwrap(),
            limsum: String::new(),
            baremin: String::new(),
            gunits: String::new(),
            goal_type: String::new(),
            rate: None,
            runits: String::new(),
        }
    }

    #[test]
    fn test_sort_goals() {
        let mut goals = vec![
            goal("zeta", 200, 5.0),
            goal("beta", 100, 5.0),
            goal("alpha", 100, 5.0),
            goal("rich", 100, 30.0),
        ];
        sort_goals(&mut goals);
        let slugs: Vec<_> = goals.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(slugs, vec!["rich", "alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_last_value_or_default() {
        assert_eq!(last_value_or_default(None), DEFAULT_DATAPOINT_VALUE);

        let detail = GoalDetail {
            goal: goal("read", 100, 5.0),
            datapoints: vec![Datapoint {
                id: "1".to_string(),
                value: 2.5,
                comment: String::new(),
                daystamp: "20260101".to_string(),
            }],
        };
        assert_eq!(last_value_or_default(Some(&detail)), "2.5");

        let whole = GoalDetail {
            datapoints: vec![Datapoint {
                value: 3.0,
                ..detail.datapoints[0].clone()
            }],
            ..detail
        };
        assert_eq!(last_value_or_default(Some(&whole)), "3");
    }
}
