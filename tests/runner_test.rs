mod common;

use std::sync::Arc;
use std::time::Duration;

use buzz::tui::form::CreateGoalForm;
use buzz::tui::model::{Overlay, Pending};
use buzz::tui::{EffectRunner, Event, Key, SessionSettings, SessionState, handle, initial};
use buzz::types::DEFAULT_COMMENT;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use common::mock_data::goals;
use common::{MockService, at, viewport};

// ============================================================================
// Reducer driven by the effect runner against an in-memory service
// ============================================================================

/// Feed events back into the reducer until `done` holds.
async fn settle(
    mut state: SessionState,
    events: &mut UnboundedReceiver<Event>,
    runner: &EffectRunner<MockService>,
    done: impl Fn(&SessionState) -> bool,
) -> SessionState {
    while !done(&state) {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for an effect")
            .expect("event channel closed");
        let (next, effects) = handle(state, event);
        state = next;
        runner.spawn_all(effects);
    }
    state
}

fn quiet_settings() -> SessionSettings {
    SessionSettings {
        auto_refresh: false,
        viewport: viewport(2, 2),
        ..SessionSettings::default()
    }
}

fn start(
    service: Arc<MockService>,
) -> (
    SessionState,
    UnboundedReceiver<Event>,
    EffectRunner<MockService>,
) {
    let (tx, rx) = unbounded_channel();
    let runner = EffectRunner::new(service, tx);
    let (state, effects) = initial(quiet_settings());
    runner.spawn_all(effects);
    (state, rx, runner)
}

fn press(state: SessionState, key: Key, runner: &EffectRunner<MockService>) -> SessionState {
    let (state, effects) = handle(state, Event::Key { key, at: at(0) });
    runner.spawn_all(effects);
    state
}

#[tokio::test]
async fn test_goals_load_on_start() {
    let service = Arc::new(MockService::with_goals(goals(&["read", "run"])));
    let (state, mut rx, runner) = start(service);

    let state = settle(state, &mut rx, &runner, |s| !s.is_pending(Pending::LoadingGoals)).await;
    assert_eq!(state.goals.len(), 2);
    assert_eq!(state.errors.list, None);
}

#[tokio::test]
async fn test_submit_datapoint_refreshes_list_and_detail() {
    let service = Arc::new(MockService::with_goals(goals(&["read"])));
    let (state, mut rx, runner) = start(service.clone());
    let state = settle(state, &mut rx, &runner, |s| !s.is_pending(Pending::LoadingGoals)).await;

    let state = press(state, Key::Enter, &runner);
    let state = settle(state, &mut rx, &runner, |s| {
        s.overlay.detail().is_some_and(|d| d.detail.is_some())
    })
    .await;

    let state = press(state, Key::Char('a'), &runner);
    let state = press(state, Key::Enter, &runner);
    assert!(state.is_pending(Pending::SubmittingDatapoint));

    let state = settle(state, &mut rx, &runner, |s| {
        s.pending.is_empty() && s.overlay.detail().is_some_and(|d| d.detail.is_some())
    })
    .await;

    let submitted = service.submitted();
    assert_eq!(submitted.len(), 1);
    let (slug, datapoint) = &submitted[0];
    assert_eq!(slug, "read");
    assert_eq!(datapoint.value, 1.0);
    assert_eq!(datapoint.comment, DEFAULT_COMMENT);
    assert_eq!(datapoint.date, jiff::civil::date(2026, 3, 10));

    let detail = state.overlay.detail().expect("detail stays open");
    assert!(detail.form.is_none());
    assert_eq!(detail.detail.as_ref().map(|d| d.datapoints.len()), Some(1));
}

#[tokio::test]
async fn test_service_failure_lands_in_list_error() {
    let service = Arc::new(MockService::with_goals(goals(&["read"])));
    service.fail_with("server unavailable");
    let (state, mut rx, runner) = start(service);

    let state = settle(state, &mut rx, &runner, |s| !s.is_pending(Pending::LoadingGoals)).await;
    assert!(state.goals.is_empty());
    let error = state.errors.list.expect("list error should be set");
    assert!(error.contains("server unavailable"));
}

#[tokio::test]
async fn test_created_goal_appears_after_refresh() {
    let service = Arc::new(MockService::with_goals(goals(&["read"])));
    let (state, mut rx, runner) = start(service);
    let state = settle(state, &mut rx, &runner, |s| !s.is_pending(Pending::LoadingGoals)).await;

    let mut state = press(state, Key::Char('n'), &runner);
    for c in "pushups".chars() {
        state = press(state, Key::Char(c), &runner);
    }
    let Overlay::Create(form) = &mut state.overlay else {
        panic!("create form should be open");
    };
    assert_eq!(form.fields.value(CreateGoalForm::SLUG), "pushups");
    form.fields.set(CreateGoalForm::TITLE, "Pushups");
    form.fields.set(CreateGoalForm::UNITS, "reps");
    form.fields.set(CreateGoalForm::TARGET_VALUE, "100");
    form.fields.set(CreateGoalForm::RATE, "1");

    let state = press(state, Key::Enter, &runner);
    assert!(state.is_pending(Pending::CreatingGoal));

    let state = settle(state, &mut rx, &runner, |s| s.pending.is_empty()).await;
    assert!(state.overlay.is_none());
    assert!(state.goals.iter().any(|g| g.slug == "pushups"));
}
