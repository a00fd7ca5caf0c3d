//! Builders for goals and goal details used across integration tests.

use buzz::{Datapoint, Goal, GoalDetail};
use jiff::Timestamp;

/// Builder for creating test goals
pub struct GoalBuilder {
    goal: Goal,
}

impl GoalBuilder {
    /// Create a goal with the given slug; its title equals the slug
    pub fn new(slug: &str) -> Self {
        Self {
            goal: Goal {
                slug: slug.to_string(),
                title: slug.to_string(),
                pledge: 5.0,
                safebuf: 3,
                losedate: Timestamp::from_second(1_773_187_200)
                    .expect("test timestamp should be valid"),
                limsum: "+1 in 3 days".to_string(),
                baremin: "+1".to_string(),
                gunits: "units".to_string(),
                goal_type: "hustler".to_string(),
                rate: Some(1.0),
                runits: "d".to_string(),
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.goal.title = title.to_string();
        self
    }

    pub fn pledge(mut self, pledge: f64) -> Self {
        self.goal.pledge = pledge;
        self
    }

    pub fn safebuf(mut self, safebuf: i64) -> Self {
        self.goal.safebuf = safebuf;
        self
    }

    pub fn losedate(mut self, losedate: Timestamp) -> Self {
        self.goal.losedate = losedate;
        self
    }

    pub fn build(self) -> Goal {
        self.goal
    }
}

/// Goals named by `slugs`, titles equal to slugs
pub fn goals(slugs: &[&str]) -> Vec<Goal> {
    slugs.iter().map(|s| GoalBuilder::new(s).build()).collect()
}

/// Detail for `goal` with one datapoint per `(daystamp, value)`
pub fn detail(goal: Goal, datapoints: &[(&str, f64)]) -> GoalDetail {
    GoalDetail {
        goal,
        datapoints: datapoints
            .iter()
            .enumerate()
            .map(|(i, (daystamp, value))| Datapoint {
                id: i.to_string(),
                value: *value,
                comment: String::new(),
                daystamp: daystamp.to_string(),
            })
            .collect(),
    }
}
