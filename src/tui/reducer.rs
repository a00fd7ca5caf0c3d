//! The session reducer.
//!
//! [`handle`] takes the current state and one event and returns the next
//! state plus the effects to run. It never performs I/O; results of effects
//! come back later as further events.

use jiff::Timestamp;

use super::form::{CreateGoalForm, DatapointForm, Fields};
use super::keymap::vim_direction;
use super::layout;
use super::model::{
    DetailOverlay, Effect, Event, Key, Overlay, Pending, SessionSettings, SessionState,
};
use super::validation::{validate_create_goal, validate_datapoint_form};
use crate::remote::last_value_or_default;
use crate::types::{Goal, GoalDetail};

/// Fresh session and the effects that start it: the first goal fetch and,
/// when enabled, the auto-refresh timer.
pub fn initial(settings: SessionSettings) -> (SessionState, Vec<Effect>) {
    let mut state = SessionState::new(settings);
    let mut effects = vec![fetch_goals(&mut state)];
    if state.auto_refresh {
        effects.push(schedule_auto_refresh(&mut state));
    }
    (state, effects)
}

/// Apply one event.
pub fn handle(mut state: SessionState, event: Event) -> (SessionState, Vec<Effect>) {
    let mut effects = Vec::new();

    match event {
        Event::Key { key, at } => {
            state.now = Some(at);
            handle_key(&mut state, key, at, &mut effects);
        }
        Event::Resize(viewport) => {
            state.viewport = viewport;
            state.clamp();
        }
        Event::GoalsLoaded { request, result } => goals_loaded(&mut state, request, result),
        Event::DetailLoaded {
            slug,
            request,
            result,
        } => detail_loaded(&mut state, &slug, request, result),
        Event::DatapointSubmitted { slug, result } => {
            datapoint_submitted(&mut state, &slug, result, &mut effects)
        }
        Event::GoalCreated { result } => goal_created(&mut state, result, &mut effects),
        Event::InactivityElapsed { at } => inactivity_elapsed(&mut state, at),
        Event::AutoRefreshTick => {
            state.auto_refresh_scheduled = false;
            if state.auto_refresh {
                effects.push(fetch_goals(&mut state));
                effects.push(schedule_auto_refresh(&mut state));
            }
        }
        Event::ExternalRefreshRequested => {
            tracing::debug!("external refresh requested");
            effects.push(fetch_goals(&mut state));
        }
    }

    (state, effects)
}

// ============================================================================
// Effect builders
// ============================================================================

fn fetch_goals(state: &mut SessionState) -> Effect {
    let request = state.take_request_id();
    state.goals_request = request;
    state.pending.insert(Pending::LoadingGoals);
    Effect::FetchGoals { request }
}

fn schedule_auto_refresh(state: &mut SessionState) -> Effect {
    state.auto_refresh_scheduled = true;
    Effect::ScheduleAutoRefresh {
        after: state.settings.refresh_interval,
    }
}

// ============================================================================
// Keys
// ============================================================================

/// Which part of the session receives keys
enum Focus {
    DatapointForm,
    Detail,
    CreateForm,
    Search,
    Grid,
}

fn focus(state: &SessionState) -> Focus {
    match &state.overlay {
        Overlay::Detail(detail) if detail.form.is_some() => Focus::DatapointForm,
        Overlay::Detail(_) => Focus::Detail,
        Overlay::Create(_) => Focus::CreateForm,
        Overlay::None if state.search.active => Focus::Search,
        Overlay::None => Focus::Grid,
    }
}

fn handle_key(state: &mut SessionState, key: Key, at: Timestamp, effects: &mut Vec<Effect>) {
    if key == Key::Interrupt {
        state.should_exit = true;
        return;
    }

    match focus(state) {
        Focus::DatapointForm => datapoint_form_key(state, key, at, effects),
        Focus::Detail => detail_key(state, key, at, effects),
        Focus::CreateForm => create_form_key(state, key, effects),
        Focus::Search => search_key(state, key, at, effects),
        Focus::Grid => grid_key(state, key, at, effects),
    }
}

fn grid_key(state: &mut SessionState, key: Key, at: Timestamp, effects: &mut Vec<Effect>) {
    match key {
        Key::Up | Key::Down | Key::Left | Key::Right => navigate(state, key, at, effects),
        Key::Enter => {
            if let Some(index) = state.selected_index() {
                open_detail(state, index, effects);
            }
        }
        Key::Escape | Key::Char('q') => state.should_exit = true,
        Key::Char('/') => {
            state.search.active = true;
            reset_query(state);
        }
        Key::Char('r') => effects.push(fetch_goals(state)),
        Key::Char('n') => state.overlay = Overlay::Create(CreateGoalForm::new()),
        Key::Char('t') => {
            state.auto_refresh = !state.auto_refresh;
            tracing::info!(enabled = state.auto_refresh, "auto-refresh toggled");
            if state.auto_refresh && !state.auto_refresh_scheduled {
                effects.push(schedule_auto_refresh(state));
            }
        }
        Key::Char(c) => {
            if let Some(direction) = vim_direction(c) {
                navigate(state, direction, at, effects);
            }
        }
        _ => {}
    }
}

fn search_key(state: &mut SessionState, key: Key, at: Timestamp, effects: &mut Vec<Effect>) {
    match key {
        Key::Escape => {
            state.search.active = false;
            reset_query(state);
        }
        Key::Enter => {
            let Some(index) = state.selected_index() else {
                return;
            };
            state.search.active = false;
            state.search.query.clear();
            open_detail(state, index, effects);
        }
        Key::Backspace => {
            state.search.query.pop();
            reset_cursor(state);
        }
        Key::Char(c) => {
            state.search.query.push(c);
            reset_cursor(state);
        }
        Key::Up | Key::Down | Key::Left | Key::Right => navigate(state, key, at, effects),
        _ => {}
    }
}

fn reset_query(state: &mut SessionState) {
    state.search.query.clear();
    reset_cursor(state);
}

fn reset_cursor(state: &mut SessionState) {
    state.cursor = 0;
    state.scroll_offset = 0;
}

/// Move within the grid. Left/right stay inside the current row.
fn navigate(state: &mut SessionState, key: Key, at: Timestamp, effects: &mut Vec<Effect>) {
    let len = state.displayed_len();
    let columns = state.columns();
    let cursor = state.cursor;

    if len > 0 {
        state.cursor = match key {
            Key::Left if layout::column_of(cursor, columns) > 0 => cursor - 1,
            Key::Right if layout::column_of(cursor, columns) + 1 < columns && cursor + 1 < len => {
                cursor + 1
            }
            Key::Up if cursor >= columns => cursor - columns,
            Key::Down if cursor + columns < len => cursor + columns,
            _ => cursor,
        };
        state.scroll_offset = layout::scroll_for_cursor(
            state.cursor,
            len,
            state.scroll_offset,
            state.viewport.width,
            state.viewport.height,
        );
    }

    state.last_navigation = Some(at);
    state.cursor_visible = true;
    effects.push(Effect::ScheduleInactivityCheck {
        after: state.settings.inactivity_delay,
    });
}

/// Open the detail view for `goals[index]`. The cursor follows the goal into
/// the unfiltered list so paging walks every goal.
fn open_detail(state: &mut SessionState, index: usize, effects: &mut Vec<Effect>) {
    let Some(slug) = state.goals.get(index).map(|g| g.slug.clone()) else {
        return;
    };

    state.cursor = index;
    state.clamp();

    let request = state.take_request_id();
    state.pending.insert(Pending::LoadingDetail);
    state.errors.detail = None;
    state.overlay = Overlay::Detail(DetailOverlay {
        slug: slug.clone(),
        detail: None,
        request,
        form: None,
    });
    effects.push(Effect::FetchGoalDetail { slug, request });
}

fn detail_key(state: &mut SessionState, key: Key, at: Timestamp, effects: &mut Vec<Effect>) {
    match key {
        Key::Escape => {
            state.overlay = Overlay::None;
            state.pending.remove(&Pending::LoadingDetail);
        }
        Key::Left | Key::Right => {
            let last = state.goals.len().saturating_sub(1);
            let next = match key {
                Key::Left => state.cursor.saturating_sub(1),
                _ => (state.cursor + 1).min(last),
            };
            if next != state.cursor {
                open_detail(state, next, effects);
            }
        }
        Key::Enter | Key::Char('a') => {
            if state.is_pending(Pending::SubmittingDatapoint) {
                return;
            }
            let today = state.today(at);
            if let Overlay::Detail(detail) = &mut state.overlay {
                let last_value = last_value_or_default(detail.detail.as_ref());
                detail.form = Some(DatapointForm::new(today, last_value));
            }
        }
        _ => {}
    }
}

/// Shared field editing for both forms. Returns true if the key was consumed.
fn edit_fields(fields: &mut Fields, key: Key) -> bool {
    match key {
        Key::Tab => fields.focus_next(),
        Key::BackTab => fields.focus_prev(),
        Key::Backspace => fields.backspace(),
        Key::Char(c) => {
            fields.insert_char(c);
        }
        _ => return false,
    }
    true
}

fn datapoint_form_key(
    state: &mut SessionState,
    key: Key,
    at: Timestamp,
    effects: &mut Vec<Effect>,
) {
    let submitting = state.is_pending(Pending::SubmittingDatapoint);
    let today = state.today(at);
    let Overlay::Detail(detail) = &mut state.overlay else {
        return;
    };
    let Some(form) = detail.form.as_mut() else {
        return;
    };

    match key {
        Key::Escape => detail.form = None,
        Key::Enter => {
            if submitting {
                return;
            }
            match validate_datapoint_form(form, today) {
                Ok(datapoint) => {
                    form.error = None;
                    effects.push(Effect::SubmitDatapoint {
                        slug: detail.slug.clone(),
                        datapoint,
                    });
                    state.pending.insert(Pending::SubmittingDatapoint);
                }
                Err(message) => form.error = Some(message),
            }
        }
        _ => {
            edit_fields(&mut form.fields, key);
        }
    }
}

fn create_form_key(state: &mut SessionState, key: Key, effects: &mut Vec<Effect>) {
    let creating = state.is_pending(Pending::CreatingGoal);
    let Overlay::Create(form) = &mut state.overlay else {
        return;
    };

    match key {
        Key::Escape => state.overlay = Overlay::None,
        Key::Enter => {
            if creating {
                return;
            }
            match validate_create_goal(form) {
                Ok(goal) => {
                    form.error = None;
                    effects.push(Effect::CreateGoal { goal });
                    state.pending.insert(Pending::CreatingGoal);
                }
                Err(message) => form.error = Some(message),
            }
        }
        _ => {
            edit_fields(&mut form.fields, key);
        }
    }
}

// ============================================================================
// Effect results
// ============================================================================

fn goals_loaded(state: &mut SessionState, request: u64, result: Result<Vec<Goal>, String>) {
    if request != state.goals_request {
        tracing::debug!(request, latest = state.goals_request, "dropping stale goal list");
        return;
    }
    state.pending.remove(&Pending::LoadingGoals);

    match result {
        Ok(goals) => {
            tracing::debug!(count = goals.len(), "goal list loaded");
            state.goals = goals;
            state.errors.list = None;
            if let Some(slug) = state.overlay.detail().map(|d| d.slug.clone())
                && let Some(index) = state.goals.iter().position(|g| g.slug == slug)
            {
                state.cursor = index;
            }
            state.clamp();
        }
        Err(message) => {
            tracing::warn!(error = %message, "failed to load goals");
            state.errors.list = Some(message);
        }
    }
}

fn detail_loaded(
    state: &mut SessionState,
    slug: &str,
    request: u64,
    result: Result<GoalDetail, String>,
) {
    let Overlay::Detail(detail) = &mut state.overlay else {
        tracing::debug!(slug, "dropping detail for closed overlay");
        state.pending.remove(&Pending::LoadingDetail);
        return;
    };
    if detail.slug != slug || detail.request != request {
        tracing::debug!(slug, request, "dropping stale detail");
        return;
    }
    state.pending.remove(&Pending::LoadingDetail);

    match result {
        Ok(loaded) => {
            detail.detail = Some(loaded);
            state.errors.detail = None;
        }
        Err(message) => {
            tracing::warn!(slug, error = %message, "failed to load goal detail");
            state.errors.detail = Some(message);
        }
    }
}

fn datapoint_submitted(
    state: &mut SessionState,
    slug: &str,
    result: Result<(), String>,
    effects: &mut Vec<Effect>,
) {
    state.pending.remove(&Pending::SubmittingDatapoint);
    let detail_open = state.overlay.detail().is_some_and(|d| d.slug == slug);

    match result {
        Ok(()) => {
            tracing::info!(slug, "datapoint added");
            effects.push(fetch_goals(state));
            if !detail_open {
                return;
            }
            let request = state.take_request_id();
            state.pending.insert(Pending::LoadingDetail);
            if let Overlay::Detail(detail) = &mut state.overlay {
                detail.form = None;
                detail.request = request;
            }
            effects.push(Effect::FetchGoalDetail {
                slug: slug.to_string(),
                request,
            });
        }
        Err(message) => {
            let form = match &mut state.overlay {
                Overlay::Detail(detail) if detail_open => detail.form.as_mut(),
                _ => None,
            };
            match form {
                Some(form) => form.error = Some(message),
                None => {
                    tracing::warn!(slug, error = %message, "datapoint failed after form closed")
                }
            }
        }
    }
}

fn goal_created(state: &mut SessionState, result: Result<Goal, String>, effects: &mut Vec<Effect>) {
    state.pending.remove(&Pending::CreatingGoal);

    match result {
        Ok(goal) => {
            tracing::info!(slug = %goal.slug, "goal created");
            if matches!(state.overlay, Overlay::Create(_)) {
                state.overlay = Overlay::None;
            }
            effects.push(fetch_goals(state));
        }
        Err(message) => match &mut state.overlay {
            Overlay::Create(form) => form.error = Some(message),
            _ => tracing::warn!(error = %message, "goal creation failed after form closed"),
        },
    }
}

fn inactivity_elapsed(state: &mut SessionState, at: Timestamp) {
    if !state.overlay.is_none() || state.search.active {
        return;
    }
    let Some(last) = state.last_navigation else {
        return;
    };
    let elapsed = last.duration_until(at).as_millis();
    let delay = i128::try_from(state.settings.inactivity_delay.as_millis()).unwrap_or(i128::MAX);
    if elapsed >= delay {
        state.cursor_visible = false;
    }
}
