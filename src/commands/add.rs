use jiff::Timestamp;
use jiff::tz::TimeZone;
use owo_colors::OwoColorize;

use super::{connect, runtime};
use crate::error::{BuzzError, Result};
use crate::refresh;
use crate::remote::GoalService;
use crate::tui::validation::validate_datapoint;
use crate::types::DEFAULT_COMMENT;

/// Add a datapoint to a goal (`buzz add`)
///
/// Input goes through the same checks as the TUI form. On success any
/// running TUI is asked to refresh.
pub fn cmd_add(slug: &str, value: &str, comment: Option<&str>, date: Option<&str>) -> Result<()> {
    let today = Timestamp::now().to_zoned(TimeZone::system()).date();
    let date = date.map(str::to_string).unwrap_or_else(|| today.to_string());
    let comment = comment.unwrap_or(DEFAULT_COMMENT);

    let datapoint =
        validate_datapoint(&date, value, comment, today).map_err(BuzzError::Validation)?;
    let shown_value = datapoint.value;

    let client = connect()?;
    runtime()?.block_on(client.submit_datapoint(slug, datapoint))?;

    if let Err(e) = refresh::flag_path().and_then(|path| refresh::request(&path)) {
        tracing::warn!(error = %e, "could not signal refresh");
    }

    println!("{} Added {} to {}", "✓".green(), shown_value, slug.cyan());
    Ok(())
}
