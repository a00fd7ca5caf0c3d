//! Executes reducer effects.
//!
//! Every [`Effect`] becomes one tokio task that sends exactly one [`Event`]
//! back to the session. Nothing is cancelled; the reducer drops results that
//! arrive too late.

use std::sync::Arc;

use jiff::Timestamp;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use super::model::{Effect, Event};
use crate::remote::GoalService;

/// Runs effects against a [`GoalService`]
pub struct EffectRunner<S> {
    service: Arc<S>,
    events: UnboundedSender<Event>,
}

impl<S> Clone for EffectRunner<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            events: self.events.clone(),
        }
    }
}

impl<S: GoalService + 'static> EffectRunner<S> {
    pub fn new(service: Arc<S>, events: UnboundedSender<Event>) -> Self {
        Self { service, events }
    }

    /// Start `effect` in the background.
    pub fn spawn(&self, effect: Effect) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = run_effect(service.as_ref(), effect).await;
            if events.send(event).is_err() {
                tracing::debug!("session closed before effect finished");
            }
        })
    }

    pub fn spawn_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }
}

/// Perform one effect and describe its outcome as an event.
pub async fn run_effect<S: GoalService>(service: &S, effect: Effect) -> Event {
    match effect {
        Effect::FetchGoals { request } => Event::GoalsLoaded {
            request,
            result: service.fetch_goals().await.map_err(|e| e.to_string()),
        },
        Effect::FetchGoalDetail { slug, request } => {
            let result = service.fetch_goal(&slug).await.map_err(|e| e.to_string());
            Event::DetailLoaded {
                slug,
                request,
                result,
            }
        }
        Effect::SubmitDatapoint { slug, datapoint } => {
            let result = service
                .submit_datapoint(&slug, datapoint)
                .await
                .map_err(|e| e.to_string());
            Event::DatapointSubmitted { slug, result }
        }
        Effect::CreateGoal { goal } => Event::GoalCreated {
            result: service.create_goal(goal).await.map_err(|e| e.to_string()),
        },
        Effect::ScheduleInactivityCheck { after } => {
            tokio::time::sleep(after).await;
            Event::InactivityElapsed {
                at: Timestamp::now(),
            }
        }
        Effect::ScheduleAutoRefresh { after } => {
            tokio::time::sleep(after).await;
            Event::AutoRefreshTick
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuzzError, Result};
    use crate::types::{Goal, GoalDetail, NewDatapoint, NewGoal};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeService {
        goals: Vec<Goal>,
        submitted: Mutex<Vec<(String, NewDatapoint)>>,
    }

    impl GoalService for FakeService {
        async fn fetch_goals(&self) -> Result<Vec<Goal>> {
            Ok(self.goals.clone())
        }

        async fn fetch_goal(&self, slug: &str) -> Result<GoalDetail> {
            self.goals
                .iter()
                .find(|g| g.slug == slug)
                .map(|g| GoalDetail {
                    goal: g.clone(),
                    datapoints: vec![],
                })
                .ok_or_else(|| BuzzError::GoalNotFound(slug.to_string()))
        }

        async fn submit_datapoint(&self, slug: &str, datapoint: NewDatapoint) -> Result<()> {
            if let Ok(mut submitted) = self.submitted.lock() {
                submitted.push((slug.to_string(), datapoint));
            }
            Ok(())
        }

        async fn create_goal(&self, _goal: NewGoal) -> Result<Goal> {
            Err(BuzzError::Api("slug taken (422)".to_string()))
        }
    }

    fn goal(slug: &str) -> Goal {
        Goal {
            slug: slug.to_string(),
            title: String::new(),
            pledge: 0.0,
            safebuf: 1,
            losedate: Timestamp::UNIX_EPOCH,
            limsum: String::new(),
            baremin: String::new(),
            gunits: String::new(),
            goal_type: String::new(),
            rate: None,
            runits: String::new(),
        }
    }

    #[tokio::test]
    async fn test_fetch_goals_carries_request_id() {
        let service = FakeService {
            goals: vec![goal("a")],
            ..FakeService::default()
        };
        let event = run_effect(&service, Effect::FetchGoals { request: 7 }).await;
        let Event::GoalsLoaded { request, result } = event else {
            panic!("unexpected event");
        };
        assert_eq!(request, 7);
        assert_eq!(result.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_errors_become_strings() {
        let service = FakeService::default();
        let event = run_effect(
            &service,
            Effect::FetchGoalDetail {
                slug: "missing".to_string(),
                request: 3,
            },
        )
        .await;
        assert_eq!(
            event,
            Event::DetailLoaded {
                slug: "missing".to_string(),
                request: 3,
                result: Err("goal 'missing' not found".to_string()),
            }
        );

        let event = run_effect(
            &service,
            Effect::CreateGoal {
                goal: NewGoal {
                    slug: "x".to_string(),
                    title: "X".to_string(),
                    goal_type: "hustler".to_string(),
                    gunits: "u".to_string(),
                    goaldate: None,
                    goalval: Some(1.0),
                    rate: Some(1.0),
                    runits: "d".to_string(),
                },
            },
        )
        .await;
        assert!(matches!(event, Event::GoalCreated { result: Err(_) }));
    }

    #[tokio::test]
    async fn test_spawn_sends_one_event_per_effect() {
        let service = Arc::new(FakeService {
            goals: vec![goal("a")],
            ..FakeService::default()
        });
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let runner = EffectRunner::new(service.clone(), tx);

        runner.spawn_all(vec![
            Effect::SubmitDatapoint {
                slug: "a".to_string(),
                datapoint: NewDatapoint {
                    date: jiff::civil::date(2026, 3, 10),
                    value: 2.0,
                    comment: String::new(),
                },
            },
            Effect::ScheduleAutoRefresh {
                after: Duration::from_millis(5),
            },
        ]);

        let mut events = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        events.sort_by_key(|e| matches!(e, Event::AutoRefreshTick));
        assert!(matches!(
            &events[0],
            Event::DatapointSubmitted { slug, result: Ok(()) } if slug == "a"
        ));
        assert_eq!(events[1], Event::AutoRefreshTick);
        assert_eq!(service.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_inactivity_timer_reports_time() {
        let before = Timestamp::now();
        let event = run_effect(
            &FakeService::default(),
            Effect::ScheduleInactivityCheck {
                after: Duration::from_millis(10),
            },
        )
        .await;
        let Event::InactivityElapsed { at } = event else {
            panic!("unexpected event");
        };
        assert!(at >= before);
    }
}
