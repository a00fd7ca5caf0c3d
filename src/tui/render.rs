//! Pure rendering of the session into a character buffer.
//!
//! [`render`] draws the header, the goal grid, the footer and any overlay
//! into a [`Frame`]. Each cell carries a [`Tone`]; the host maps tones to
//! terminal colors. Tests read frames back as plain lines.

use super::form::{Field, Fields};
use super::layout::{self, CELL_HEIGHT, CELL_WIDTH, FOOTER_HEIGHT, HEADER_HEIGHT};
use super::model::{DetailOverlay, Overlay, Pending, SessionState};
use crate::types::{BufferTier, Goal};
use crate::utils::{format_pledge, truncate};

/// Visual role of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    Dim,
    Accent,
    Match,
    Error,
    Border,
    Tier(BufferTier),
}

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub tone: Tone,
    /// Drawn bold / selected
    pub strong: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            tone: Tone::Plain,
            strong: false,
        }
    }
}

/// A run of same-styled cells on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
    pub strong: bool,
}

/// Fixed-size character buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let (width, height) = (usize::from(width), usize::from(height));
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        (x < self.width && y < self.height).then(|| &self.cells[y * self.width + x])
    }

    /// Write `text` starting at (x, y), clipped to the frame. Returns the
    /// column after the last written character.
    pub fn put(&mut self, x: usize, y: usize, text: &str, tone: Tone, strong: bool) -> usize {
        let mut col = x;
        if y >= self.height {
            return col;
        }
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            self.cells[y * self.width + col] = Cell { ch, tone, strong };
            col += 1;
        }
        col
    }

    /// Blank a rectangle.
    pub fn clear(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.cells[row * self.width + col] = Cell::default();
            }
        }
    }

    /// Blank a rectangle and draw a border around it.
    pub fn boxed(&mut self, x: usize, y: usize, w: usize, h: usize, title: &str) {
        if w < 2 || h < 2 {
            return;
        }
        self.clear(x, y, w, h);
        let inner = w - 2;
        self.put(x, y, &format!("┌{}┐", "─".repeat(inner)), Tone::Border, false);
        for row in y + 1..y + h - 1 {
            self.put(x, row, "│", Tone::Border, false);
            self.put(x + w - 1, row, "│", Tone::Border, false);
        }
        self.put(x, y + h - 1, &format!("└{}┘", "─".repeat(inner)), Tone::Border, false);
        if !title.is_empty() {
            let title = truncate(&format!(" {title} "), inner);
            self.put(x + 2, y, &title, Tone::Accent, true);
        }
    }

    /// Plain text of each line, trailing spaces trimmed.
    pub fn to_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| {
                row.iter()
                    .map(|c| c.ch)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    /// Line `y` split into runs of identical style.
    pub fn spans(&self, y: usize) -> Vec<Span> {
        let mut spans: Vec<Span> = Vec::new();
        if y >= self.height {
            return spans;
        }
        for cell in &self.cells[y * self.width..(y + 1) * self.width] {
            match spans.last_mut() {
                Some(last) if last.tone == cell.tone && last.strong == cell.strong => {
                    last.text.push(cell.ch);
                }
                _ => spans.push(Span {
                    text: cell.ch.to_string(),
                    tone: cell.tone,
                    strong: cell.strong,
                }),
            }
        }
        spans
    }
}

/// A key hint shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    pub action: &'static str,
}

const fn shortcut(key: &'static str, action: &'static str) -> Shortcut {
    Shortcut { key, action }
}

/// Hints for whatever currently has the keyboard
pub fn shortcuts(state: &SessionState) -> Vec<Shortcut> {
    match &state.overlay {
        Overlay::Detail(detail) if detail.form.is_some() => vec![
            shortcut("Tab", "Next field"),
            shortcut("Enter", "Submit"),
            shortcut("Esc", "Cancel"),
        ],
        Overlay::Detail(_) => vec![
            shortcut("←/→", "Prev/next goal"),
            shortcut("a", "Add datapoint"),
            shortcut("Esc", "Close"),
        ],
        Overlay::Create(_) => vec![
            shortcut("Tab", "Next field"),
            shortcut("Enter", "Create"),
            shortcut("Esc", "Cancel"),
        ],
        Overlay::None if state.search.active => vec![
            shortcut("Enter", "Open"),
            shortcut("Esc", "Clear"),
        ],
        Overlay::None => vec![
            shortcut("↑↓←→", "Move"),
            shortcut("Enter", "Open"),
            shortcut("/", "Search"),
            shortcut("n", "New"),
            shortcut("r", "Refresh"),
            shortcut("t", "Auto"),
            shortcut("q", "Quit"),
        ],
    }
}

/// Draw the whole session.
pub fn render(state: &SessionState) -> Frame {
    let mut frame = Frame::new(state.viewport.width, state.viewport.height);

    render_header(&mut frame, state);
    render_grid(&mut frame, state);
    render_footer(&mut frame, state);

    match &state.overlay {
        Overlay::None => {}
        Overlay::Detail(detail) => render_detail(&mut frame, state, detail),
        Overlay::Create(form) => {
            let creating = state.is_pending(Pending::CreatingGoal);
            let status = creating.then_some("Creating…");
            render_form_box(
                &mut frame,
                "New goal",
                &form.fields,
                form.error.as_deref(),
                status,
            );
        }
    }

    frame
}

fn render_header(frame: &mut Frame, state: &SessionState) {
    let end = frame.put(0, 0, "buzz", Tone::Accent, true);
    let count = format!("  {} goals", state.goals.len());
    let end = frame.put(end, 0, &count, Tone::Dim, false);

    let refresh = if state.auto_refresh {
        "auto-refresh on"
    } else {
        "auto-refresh off"
    };
    let x = frame.width().saturating_sub(refresh.chars().count());
    if x >= end + 2 {
        frame.put(x, 0, refresh, Tone::Dim, false);
    }

    if state.search.active {
        let end = frame.put(0, 1, "/", Tone::Accent, true);
        let end = frame.put(end, 1, &state.search.query, Tone::Plain, false);
        frame.put(end, 1, "▏", Tone::Accent, false);
    } else if let Some(error) = &state.errors.list {
        frame.put(0, 1, &format!("! {error}"), Tone::Error, false);
    }
}

fn render_grid(frame: &mut Frame, state: &SessionState) {
    let displayed = state.displayed();
    let top = usize::from(HEADER_HEIGHT);

    if displayed.is_empty() {
        let message = if state.is_pending(Pending::LoadingGoals) && state.goals.is_empty() {
            "Loading goals…".to_string()
        } else if !state.search.query.is_empty() {
            format!("No goals match '{}'", state.search.query)
        } else {
            "No goals".to_string()
        };
        frame.put(1, top + 1, &message, Tone::Dim, false);
        return;
    }

    let columns = state.columns();
    let visible_rows = state.visible_rows();
    let highlight = state.cursor_visible && state.overlay.is_none();

    for (position, filtered) in displayed.iter().enumerate() {
        let row = layout::row_of(position, columns);
        if row < state.scroll_offset || row >= state.scroll_offset + visible_rows {
            continue;
        }
        let x = layout::column_of(position, columns) * usize::from(CELL_WIDTH);
        let y = top + (row - state.scroll_offset) * usize::from(CELL_HEIGHT);
        let selected = highlight && position == state.cursor;
        render_card(frame, x, y, filtered.goal, &filtered.title_indices, selected);
    }
}

fn render_card(
    frame: &mut Frame,
    x: usize,
    y: usize,
    goal: &Goal,
    title_matches: &[usize],
    selected: bool,
) {
    let inner = usize::from(CELL_WIDTH) - 2;
    let tone = Tone::Tier(goal.tier());
    let marker = if selected { "▶" } else { " " };

    let end = frame.put(x, y, marker, Tone::Accent, true);
    frame.put(end, y, &truncate(&goal.slug, inner), tone, true);

    let title = truncate(&goal.title, inner);
    for (i, ch) in title.chars().enumerate() {
        let matched = title_matches.contains(&i);
        let tone = if matched { Tone::Match } else { Tone::Dim };
        frame.put(x + 1 + i, y + 1, &ch.to_string(), tone, matched || selected);
    }

    let summary = format!("{} {}", goal.baremin, format_pledge(goal.pledge));
    frame.put(x + 1, y + 2, &truncate(summary.trim(), inner), tone, selected);
}

fn render_footer(frame: &mut Frame, state: &SessionState) {
    let height = frame.height();
    if height < usize::from(FOOTER_HEIGHT) {
        return;
    }
    let status_row = height - 2;
    let keys_row = height - 1;

    let status = state
        .pending
        .iter()
        .map(|p| match p {
            Pending::LoadingGoals => "Refreshing goals…",
            Pending::LoadingDetail => "Loading detail…",
            Pending::SubmittingDatapoint => "Submitting datapoint…",
            Pending::CreatingGoal => "Creating goal…",
        })
        .collect::<Vec<_>>()
        .join("  ");
    frame.put(0, status_row, &status, Tone::Dim, false);

    let mut x = 0;
    for hint in shortcuts(state) {
        x = frame.put(x, keys_row, &format!("[{}]", hint.key), Tone::Accent, true);
        x = frame.put(x, keys_row, &format!(" {}  ", hint.action), Tone::Plain, false);
    }
}

/// Centered box of at most `max_w` x `max_h`, leaving a margin.
fn centered(frame: &Frame, max_w: usize, max_h: usize) -> (usize, usize, usize, usize) {
    let w = max_w.min(frame.width().saturating_sub(2));
    let h = max_h.min(frame.height().saturating_sub(2));
    let x = (frame.width() - w) / 2;
    let y = (frame.height() - h) / 2;
    (x, y, w, h)
}

fn render_detail(frame: &mut Frame, state: &SessionState, overlay: &DetailOverlay) {
    let (x, y, w, h) = centered(frame, 64, 20);
    if w < 4 || h < 4 {
        return;
    }
    frame.boxed(x, y, w, h, &overlay.slug);

    let inner = w - 4;
    let left = x + 2;
    let bottom = y + h - 1;
    let mut row = y + 1;
    let mut line = |frame: &mut Frame, text: &str, tone: Tone, strong: bool| {
        if row < bottom {
            frame.put(left, row, &truncate(text, inner), tone, strong);
            row += 1;
        }
    };

    let goal = overlay
        .detail
        .as_ref()
        .map(|d| &d.goal)
        .or_else(|| state.goals.iter().find(|g| g.slug == overlay.slug));

    if let Some(goal) = goal {
        let tone = Tone::Tier(goal.tier());
        line(frame, &goal.title, Tone::Plain, true);
        let summary = format!(
            "Pledge {}   Buffer {}d ({})",
            format_pledge(goal.pledge),
            goal.safebuf,
            goal.tier()
        );
        line(frame, &summary, tone, false);
        line(frame, &format!("Bare min: {}", goal.baremin), tone, false);
        line(frame, &goal.limsum, Tone::Dim, false);
        if let Some(rate) = goal.rate {
            line(
                frame,
                &format!("Rate: {rate} {} / {}", goal.gunits, goal.runits),
                Tone::Dim,
                false,
            );
        }
    }

    if let Some(error) = &state.errors.detail {
        line(frame, &format!("! {error}"), Tone::Error, false);
    }

    match &overlay.detail {
        None if state.is_pending(Pending::LoadingDetail) => {
            line(frame, "Loading datapoints…", Tone::Dim, false);
        }
        None => {}
        Some(detail) => {
            line(frame, "", Tone::Plain, false);
            line(frame, "Recent datapoints", Tone::Accent, true);
            let mut points: Vec<_> = detail.datapoints.iter().collect();
            points.sort_by(|a, b| b.daystamp.cmp(&a.daystamp));
            if points.is_empty() {
                line(frame, "(none)", Tone::Dim, false);
            }
            for dp in points.iter().take(5) {
                line(
                    frame,
                    &format!("{}  {:>8}  {}", dp.daystamp, dp.value, dp.comment),
                    Tone::Plain,
                    false,
                );
            }
        }
    }

    if let Some(form) = &overlay.form {
        let submitting = state.is_pending(Pending::SubmittingDatapoint);
        render_form_box(
            frame,
            "Add datapoint",
            &form.fields,
            form.error.as_deref(),
            submitting.then_some("Submitting…"),
        );
    }
}

fn render_form_box(
    frame: &mut Frame,
    title: &str,
    fields: &Fields,
    error: Option<&str>,
    status: Option<&str>,
) {
    let height = fields.len() + 4;
    let (x, y, w, h) = centered(frame, 48, height);
    if w < 4 || h < 3 {
        return;
    }
    frame.boxed(x, y, w, h, title);

    let label_width = fields.iter().map(|f| f.label.len()).max().unwrap_or(0);
    let bottom = y + h - 1;
    for (i, Field { label, value, .. }) in fields.iter().enumerate() {
        let row = y + 1 + i;
        if row >= bottom {
            break;
        }
        let focused = i == fields.focus();
        let marker = if focused { "▶ " } else { "  " };
        let end = frame.put(x + 1, row, marker, Tone::Accent, true);
        let end = frame.put(end, row, &format!("{label:<label_width$}  "), Tone::Dim, false);
        let end = frame.put(end, row, value, Tone::Plain, focused);
        if focused {
            frame.put(end, row, "▏", Tone::Accent, false);
        }
    }

    let message_row = y + 1 + fields.len() + 1;
    if message_row < bottom {
        let inner = w.saturating_sub(4);
        if let Some(status) = status {
            frame.put(x + 2, message_row, &truncate(status, inner), Tone::Dim, false);
        } else if let Some(error) = error {
            frame.put(x + 2, message_row, &truncate(error, inner), Tone::Error, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::model::{SessionSettings, Viewport};
    use jiff::Timestamp;

    fn goal(slug: &str, safebuf: i64) -> Goal {
        Goal {
            slug: slug.to_string(),
            title: format!("Title of {slug}"),
            pledge: 5.0,
            safebuf,
            losedate: Timestamp::UNIX_EPOCH,
            limsum: "+1 in 2 days".to_string(),
            baremin: "+1".to_string(),
            gunits: "pages".to_string(),
            goal_type: "hustler".to_string(),
            rate: Some(1.0),
            runits: "d".to_string(),
        }
    }

    fn state(width: u16, height: u16, goals: Vec<Goal>) -> SessionState {
        let mut state = SessionState::new(SessionSettings {
            viewport: Viewport { width, height },
            ..SessionSettings::default()
        });
        state.goals = goals;
        state
    }

    #[test]
    fn test_frame_put_clips() {
        let mut frame = Frame::new(5, 2);
        let end = frame.put(3, 0, "abcdef", Tone::Plain, false);
        assert_eq!(end, 5);
        frame.put(0, 9, "ignored", Tone::Plain, false);
        assert_eq!(frame.to_lines(), vec!["   ab", ""]);
    }

    #[test]
    fn test_spans_group_styles() {
        let mut frame = Frame::new(6, 1);
        frame.put(0, 0, "ab", Tone::Accent, true);
        frame.put(2, 0, "cd", Tone::Plain, false);
        let spans = frame.spans(0);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "ab");
        assert_eq!(spans[1].text, "cd  ");
    }

    #[test]
    fn test_render_grid_cards() {
        let state = state(44, 14, vec![goal("alpha", 0), goal("beta", 9), goal("gamma", 3)]);
        let frame = render(&state);
        let lines = frame.to_lines();

        assert!(lines[0].starts_with("buzz  3 goals"));
        assert!(lines[2].contains("▶alpha"));
        assert!(lines[2].contains(" beta"));
        assert!(lines[6].contains("gamma"));

        let cell = frame.cell(1, 2).unwrap();
        assert_eq!(cell.tone, Tone::Tier(BufferTier::Critical));
    }

    #[test]
    fn test_hidden_cursor_has_no_marker() {
        let mut state = state(44, 14, vec![goal("alpha", 0)]);
        state.cursor_visible = false;
        let lines = render(&state).to_lines();
        assert!(!lines[2].contains('▶'));
    }

    #[test]
    fn test_render_scrolled_grid() {
        let goals = (0..6).map(|i| goal(&format!("g{i}"), 5)).collect();
        let mut state = state(22, 12, goals);
        state.cursor = 4;
        state.scroll_offset = 3;
        let lines = render(&state).to_lines();
        assert!(lines[2].contains("g3"));
        assert!(lines[6].contains("g4"));
        assert!(!lines.iter().any(|l| l.contains("g0")));
    }

    #[test]
    fn test_render_empty_states() {
        let mut state = state(60, 12, vec![]);
        state.pending.insert(Pending::LoadingGoals);
        assert!(render(&state).to_lines()[3].contains("Loading goals…"));

        let mut state = state;
        state.goals = vec![goal("alpha", 1)];
        state.search.active = true;
        state.search.query = "zz".to_string();
        let lines = render(&state).to_lines();
        assert!(lines[1].starts_with("/zz"));
        assert!(lines[3].contains("No goals match 'zz'"));
    }

    #[test]
    fn test_render_list_error_and_footer() {
        let mut state = state(80, 12, vec![goal("alpha", 1)]);
        state.errors.list = Some("network down".to_string());
        let lines = render(&state).to_lines();
        assert_eq!(lines[1], "! network down");
        assert!(lines[11].contains("[q] Quit"));
    }

    #[test]
    fn test_render_detail_and_form() {
        let mut state = state(80, 24, vec![goal("alpha", 1)]);
        state.overlay = Overlay::Detail(DetailOverlay {
            slug: "alpha".to_string(),
            detail: None,
            request: 1,
            form: None,
        });
        state.pending.insert(Pending::LoadingDetail);
        let text = render(&state).to_lines().join("\n");
        assert!(text.contains(" alpha "));
        assert!(text.contains("Title of alpha"));
        assert!(text.contains("Loading datapoints…"));
        assert!(text.contains("[a] Add datapoint"));

        if let Overlay::Detail(detail) = &mut state.overlay {
            let mut form = crate::tui::form::DatapointForm::new(
                jiff::civil::date(2026, 3, 10),
                "1".to_string(),
            );
            form.error = Some("Value is required".to_string());
            detail.form = Some(form);
        }
        let text = render(&state).to_lines().join("\n");
        assert!(text.contains("Add datapoint"));
        assert!(text.contains("2026-03-10"));
        assert!(text.contains("Value is required"));
    }

    #[test]
    fn test_render_create_form() {
        let mut state = state(80, 24, vec![]);
        state.overlay = Overlay::Create(crate::tui::form::CreateGoalForm::new());
        let text = render(&state).to_lines().join("\n");
        assert!(text.contains("New goal"));
        assert!(text.contains("Goal date"));
        assert!(text.contains("null"));
    }

    #[test]
    fn test_render_tiny_viewport_does_not_panic() {
        let mut state = state(3, 2, vec![goal("alpha", 1)]);
        state.overlay = Overlay::Create(crate::tui::form::CreateGoalForm::new());
        let frame = render(&state);
        assert_eq!(frame.height(), 2);
    }
}
