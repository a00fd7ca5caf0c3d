//! Goal reports (`buzz list`, `next`, `today`, `tomorrow`, `due`)

use jiff::tz::TimeZone;
use jiff::{SignedDuration, Span, Timestamp};
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{connect, print_json, runtime, tier_colored};
use crate::error::{BuzzError, Result};
use crate::remote::GoalService;
use crate::types::Goal;
use crate::utils::{format_due, format_pledge, parse_duration};

/// A row in the goal table
#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "Goal")]
    slug: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Bare min")]
    baremin: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Buffer")]
    buffer: String,
    #[tabled(rename = "Pledge")]
    pledge: String,
}

impl GoalRow {
    fn new(goal: &Goal, now: Timestamp) -> Self {
        GoalRow {
            slug: tier_colored(&goal.slug, goal.tier()),
            title: goal.title.clone(),
            baremin: goal.baremin.clone(),
            due: format_due(goal.losedate, now),
            buffer: format!("{}d", goal.safebuf),
            pledge: format_pledge(goal.pledge),
        }
    }
}

/// Which goals a due report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueWindow {
    EndOfToday,
    EndOfTomorrow,
    Within(SignedDuration),
}

impl DueWindow {
    /// The latest derailment time included in the report.
    pub fn deadline(self, now: Timestamp, tz: &TimeZone) -> Result<Timestamp> {
        match self {
            DueWindow::EndOfToday => end_of_day(now, tz, 0),
            DueWindow::EndOfTomorrow => end_of_day(now, tz, 1),
            DueWindow::Within(duration) => now
                .checked_add(duration)
                .map_err(|e| BuzzError::Other(format!("duration out of range: {e}"))),
        }
    }

    fn describe(self) -> String {
        match self {
            DueWindow::EndOfToday => "today".to_string(),
            DueWindow::EndOfTomorrow => "by tomorrow".to_string(),
            DueWindow::Within(duration) => format!("within {duration:#}"),
        }
    }
}

fn end_of_day(now: Timestamp, tz: &TimeZone, days_ahead: i64) -> Result<Timestamp> {
    let out_of_range = |e: jiff::Error| BuzzError::Other(format!("date out of range: {e}"));
    let date = now
        .to_zoned(tz.clone())
        .date()
        .checked_add(Span::new().days(days_ahead))
        .map_err(out_of_range)?;
    let zoned = date
        .at(23, 59, 59, 0)
        .to_zoned(tz.clone())
        .map_err(out_of_range)?;
    Ok(zoned.timestamp())
}

/// Goals derailing at or before `deadline`, in list order
pub fn due_within(goals: &[Goal], deadline: Timestamp) -> Vec<&Goal> {
    goals.iter().filter(|g| g.losedate <= deadline).collect()
}

pub fn goal_to_json(goal: &Goal) -> serde_json::Value {
    json!({
        "slug": goal.slug,
        "title": goal.title,
        "pledge": goal.pledge,
        "safebuf": goal.safebuf,
        "losedate": goal.losedate.to_string(),
        "limsum": goal.limsum,
        "baremin": goal.baremin,
        "tier": goal.tier().to_string(),
    })
}

fn fetch_goals() -> Result<Vec<Goal>> {
    let client = connect()?;
    runtime()?.block_on(client.fetch_goals())
}

fn print_goals(goals: &[&Goal], now: Timestamp, output_json: bool) -> Result<()> {
    if output_json {
        let items: Vec<_> = goals.iter().map(|g| goal_to_json(g)).collect();
        return print_json(&json!(items));
    }

    let rows: Vec<GoalRow> = goals.iter().map(|g| GoalRow::new(g, now)).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

/// List all goals, most urgent first
pub fn cmd_list(output_json: bool) -> Result<()> {
    let goals = fetch_goals()?;
    if goals.is_empty() && !output_json {
        println!("No goals found.");
        return Ok(());
    }
    let all: Vec<&Goal> = goals.iter().collect();
    print_goals(&all, Timestamp::now(), output_json)?;
    if !output_json {
        println!("\n{} goal(s)", goals.len());
    }
    Ok(())
}

/// Show the single most urgent goal
pub fn cmd_next(output_json: bool) -> Result<()> {
    let goals = fetch_goals()?;
    let Some(goal) = goals.first() else {
        if output_json {
            return print_json(&serde_json::Value::Null);
        }
        println!("No goals found.");
        return Ok(());
    };

    if output_json {
        return print_json(&goal_to_json(goal));
    }

    println!(
        "{} {} - {}",
        tier_colored(&goal.slug, goal.tier()).bold(),
        format!("({})", format_due(goal.losedate, Timestamp::now())).dimmed(),
        goal.title
    );
    if !goal.baremin.is_empty() {
        println!("  Bare min: {}", goal.baremin);
    }
    if !goal.limsum.is_empty() {
        println!("  {}", goal.limsum);
    }
    println!("  Pledge:   {}", format_pledge(goal.pledge));
    Ok(())
}

fn cmd_due_report(window: DueWindow, output_json: bool) -> Result<()> {
    let goals = fetch_goals()?;
    let now = Timestamp::now();
    let deadline = window.deadline(now, &TimeZone::system())?;
    let due = due_within(&goals, deadline);
    tracing::debug!(window = ?window, count = due.len(), "due report");

    if due.is_empty() && !output_json {
        println!("No goals due {}.", window.describe());
        return Ok(());
    }
    print_goals(&due, now, output_json)
}

pub fn cmd_today(output_json: bool) -> Result<()> {
    cmd_due_report(DueWindow::EndOfToday, output_json)
}

pub fn cmd_tomorrow(output_json: bool) -> Result<()> {
    cmd_due_report(DueWindow::EndOfTomorrow, output_json)
}

/// Goals due within a duration such as `2h` or `3d`
pub fn cmd_due(duration: &str, output_json: bool) -> Result<()> {
    let duration = parse_duration(duration)?;
    cmd_due_report(DueWindow::Within(duration), output_json)
}
