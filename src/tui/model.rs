//! Session state for the goal browser, and the events and effects that the
//! reducer consumes and produces.
//!
//! Nothing here performs I/O. Events that depend on the clock carry the
//! instant they happened so the reducer stays a pure function.

use std::collections::BTreeSet;
use std::time::Duration;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use super::filter::{FilteredGoal, displayed_goals, displayed_indices};
use super::form::{CreateGoalForm, DatapointForm};
use super::layout;
use crate::config::Config;
use crate::types::{Goal, GoalDetail, NewDatapoint, NewGoal};

/// Startup settings for a session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub auto_refresh: bool,
    pub refresh_interval: Duration,
    pub inactivity_delay: Duration,
    pub time_zone: TimeZone,
    pub viewport: Viewport,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            refresh_interval: Duration::from_secs(300),
            inactivity_delay: Duration::from_secs(3),
            time_zone: TimeZone::UTC,
            viewport: Viewport::default(),
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &Config, viewport: Viewport) -> Self {
        Self {
            auto_refresh: config.auto_refresh,
            refresh_interval: Duration::from_secs(config.refresh_interval_secs),
            inactivity_delay: Duration::from_secs(config.inactivity_timeout_secs),
            time_zone: TimeZone::system(),
            viewport,
        }
    }
}

/// Terminal size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// Keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    /// Ctrl+C
    Interrupt,
}

/// Work in flight, shown as loading indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pending {
    LoadingGoals,
    LoadingDetail,
    SubmittingDatapoint,
    CreatingGoal,
}

/// Errors from the list and detail fetches. Form errors live on the forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSlots {
    pub list: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// Detail view for one goal
#[derive(Debug, Clone, PartialEq)]
pub struct DetailOverlay {
    pub slug: String,
    /// Loaded detail; `None` until the matching response arrives
    pub detail: Option<GoalDetail>,
    /// Correlation id of the outstanding detail request
    pub request: u64,
    /// Datapoint entry sub-form, when open
    pub form: Option<DatapointForm>,
}

/// What is drawn over the grid. At most one at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Overlay {
    #[default]
    None,
    Detail(DetailOverlay),
    Create(CreateGoalForm),
}

impl Overlay {
    pub fn is_none(&self) -> bool {
        matches!(self, Overlay::None)
    }

    pub fn detail(&self) -> Option<&DetailOverlay> {
        match self {
            Overlay::Detail(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Inputs to the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key {
        key: Key,
        at: Timestamp,
    },
    Resize(Viewport),
    GoalsLoaded {
        request: u64,
        result: Result<Vec<Goal>, String>,
    },
    DetailLoaded {
        slug: String,
        request: u64,
        result: Result<GoalDetail, String>,
    },
    DatapointSubmitted {
        slug: String,
        result: Result<(), String>,
    },
    GoalCreated {
        result: Result<Goal, String>,
    },
    InactivityElapsed {
        at: Timestamp,
    },
    AutoRefreshTick,
    ExternalRefreshRequested,
}

/// Work requested by the reducer. Each one yields exactly one [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchGoals {
        request: u64,
    },
    FetchGoalDetail {
        slug: String,
        request: u64,
    },
    SubmitDatapoint {
        slug: String,
        datapoint: NewDatapoint,
    },
    CreateGoal {
        goal: NewGoal,
    },
    ScheduleInactivityCheck {
        after: Duration,
    },
    ScheduleAutoRefresh {
        after: Duration,
    },
}

/// Everything the goal browser knows
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Goals in server order
    pub goals: Vec<Goal>,
    /// Index into the displayed (possibly filtered) list
    pub cursor: usize,
    /// First visible grid row
    pub scroll_offset: usize,
    pub viewport: Viewport,
    pub overlay: Overlay,
    pub search: SearchState,
    pub pending: BTreeSet<Pending>,
    pub errors: ErrorSlots,
    pub auto_refresh: bool,
    /// A refresh tick is outstanding
    pub auto_refresh_scheduled: bool,
    pub last_navigation: Option<Timestamp>,
    pub cursor_visible: bool,
    /// Id of the newest goal list request
    pub goals_request: u64,
    pub next_request_id: u64,
    pub should_exit: bool,
    /// Last instant seen on a key event, for status display
    pub now: Option<Timestamp>,
    pub settings: SessionSettings,
}

impl SessionState {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            goals: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            viewport: settings.viewport,
            overlay: Overlay::None,
            search: SearchState::default(),
            pending: BTreeSet::new(),
            errors: ErrorSlots::default(),
            auto_refresh: settings.auto_refresh,
            auto_refresh_scheduled: false,
            last_navigation: None,
            cursor_visible: true,
            goals_request: 0,
            next_request_id: 1,
            should_exit: false,
            now: None,
            settings,
        }
    }

    /// Goals currently shown, after the search filter, with title highlights
    pub fn displayed(&self) -> Vec<FilteredGoal<'_>> {
        displayed_goals(&self.goals, &self.search.query)
    }

    /// Unfiltered indices of the goals currently shown
    pub fn displayed_indices(&self) -> Vec<usize> {
        displayed_indices(&self.goals, &self.search.query)
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed_indices().len()
    }

    /// Unfiltered index of the goal under the cursor
    pub fn selected_index(&self) -> Option<usize> {
        self.displayed_indices().get(self.cursor).copied()
    }

    /// Goal under the cursor, if any
    pub fn selected(&self) -> Option<&Goal> {
        self.selected_index().and_then(|index| self.goals.get(index))
    }

    pub fn columns(&self) -> usize {
        layout::columns_for(self.viewport.width)
    }

    pub fn visible_rows(&self) -> usize {
        layout::visible_rows_for(self.viewport.height)
    }

    pub fn is_pending(&self, pending: Pending) -> bool {
        self.pending.contains(&pending)
    }

    pub fn today(&self, at: Timestamp) -> Date {
        at.to_zoned(self.settings.time_zone.clone()).date()
    }

    /// Hand out the next correlation id
    pub fn take_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Restore the cursor and scroll invariants after the goal list,
    /// query or viewport changed.
    pub fn clamp(&mut self) {
        let len = self.displayed_len();
        self.cursor = if len == 0 {
            0
        } else {
            self.cursor.min(len - 1)
        };
        self.scroll_offset = layout::scroll_for_cursor(
            self.cursor,
            len,
            self.scroll_offset,
            self.viewport.width,
            self.viewport.height,
        );
    }
}
