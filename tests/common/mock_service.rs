//! In-memory [`GoalService`] for driving sessions without the network.

use std::sync::Mutex;

use buzz::error::{BuzzError, Result};
use buzz::remote::sort_goals;
use buzz::{Goal, GoalDetail, GoalService, NewDatapoint, NewGoal};

use super::mock_data::detail;

#[derive(Default)]
pub struct MockService {
    pub goals: Mutex<Vec<Goal>>,
    pub datapoints: Mutex<Vec<(String, NewDatapoint)>>,
    /// When set, every call fails with this message
    pub failure: Mutex<Option<String>>,
}

impl MockService {
    pub fn with_goals(goals: Vec<Goal>) -> Self {
        Self {
            goals: Mutex::new(goals),
            ..Self::default()
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    fn check(&self) -> Result<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(BuzzError::Api(message.clone())),
            None => Ok(()),
        }
    }

    pub fn submitted(&self) -> Vec<(String, NewDatapoint)> {
        self.datapoints.lock().unwrap().clone()
    }
}

impl GoalService for MockService {
    async fn fetch_goals(&self) -> Result<Vec<Goal>> {
        self.check()?;
        let mut goals = self.goals.lock().unwrap().clone();
        sort_goals(&mut goals);
        Ok(goals)
    }

    async fn fetch_goal(&self, slug: &str) -> Result<GoalDetail> {
        self.check()?;
        let goal = self
            .goals
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.slug == slug)
            .cloned()
            .ok_or_else(|| BuzzError::GoalNotFound(slug.to_string()))?;
        let points: Vec<(String, f64)> = self
            .datapoints
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == slug)
            .map(|(_, dp)| (dp.daystamp(), dp.value))
            .collect();
        let borrowed: Vec<(&str, f64)> = points.iter().map(|(d, v)| (d.as_str(), *v)).collect();
        Ok(detail(goal, &borrowed))
    }

    async fn submit_datapoint(&self, slug: &str, datapoint: NewDatapoint) -> Result<()> {
        self.check()?;
        self.datapoints
            .lock()
            .unwrap()
            .push((slug.to_string(), datapoint));
        Ok(())
    }

    async fn create_goal(&self, goal: NewGoal) -> Result<Goal> {
        self.check()?;
        let created = super::GoalBuilder::new(&goal.slug).title(&goal.title).build();
        self.goals.lock().unwrap().push(created.clone());
        Ok(created)
    }
}
