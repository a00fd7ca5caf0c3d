//! Synchronous checks run when a form is submitted.
//!
//! On success the form's text is turned into the typed request; on failure
//! the returned message is shown in the form's error line.

use jiff::civil::Date;

use super::form::{CreateGoalForm, DatapointForm, NOT_PROVIDED};
use crate::types::{NewDatapoint, NewGoal};
use crate::utils::{parse_date, parse_value};

pub const TWO_OF_THREE_MESSAGE: &str =
    "Exactly 2 of 3 (goal date, goal value, rate) must be provided";

pub const FUTURE_DATE_MESSAGE: &str = "Date cannot be more than 1 day in the future";

/// Validate the datapoint fields against `today`.
pub fn validate_datapoint(
    date: &str,
    value: &str,
    comment: &str,
    today: Date,
) -> Result<NewDatapoint, String> {
    let date = date.trim();
    if date.is_empty() {
        return Err("Date is required".to_string());
    }
    let date =
        parse_date(date).map_err(|_| "Invalid date format (use YYYY-MM-DD)".to_string())?;
    if (date - today).get_days() > 1 {
        return Err(FUTURE_DATE_MESSAGE.to_string());
    }

    let value = value.trim();
    if value.is_empty() {
        return Err("Value is required".to_string());
    }
    let value = parse_value(value).ok_or_else(|| "Value must be a number".to_string())?;

    Ok(NewDatapoint {
        date,
        value,
        comment: comment.trim().to_string(),
    })
}

pub fn validate_datapoint_form(form: &DatapointForm, today: Date) -> Result<NewDatapoint, String> {
    validate_datapoint(form.date(), form.value(), form.comment(), today)
}

fn provided(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty() && !text.eq_ignore_ascii_case(NOT_PROVIDED)).then_some(text)
}

fn required<'a>(text: &'a str, name: &str) -> Result<&'a str, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(format!("{name} is required"));
    }
    Ok(text)
}

/// Validate the goal creation form.
pub fn validate_create_goal(form: &CreateGoalForm) -> Result<NewGoal, String> {
    let slug = required(form.value(CreateGoalForm::SLUG), "Slug")?;
    let title = required(form.value(CreateGoalForm::TITLE), "Title")?;
    let goal_type = required(form.value(CreateGoalForm::GOAL_TYPE), "Goal type")?;
    let gunits = required(form.value(CreateGoalForm::UNITS), "Units")?;

    let goaldate = provided(form.value(CreateGoalForm::TARGET_DATE));
    let goalval = provided(form.value(CreateGoalForm::TARGET_VALUE));
    let rate = provided(form.value(CreateGoalForm::RATE));

    let count = [goaldate, goalval, rate].iter().filter(|v| v.is_some()).count();
    if count != 2 {
        return Err(TWO_OF_THREE_MESSAGE.to_string());
    }

    let goaldate = goaldate
        .map(|d| parse_date(d).map_err(|_| "Invalid goal date (use YYYY-MM-DD)".to_string()))
        .transpose()?;
    let goalval = goalval
        .map(|v| parse_value(v).ok_or_else(|| "Goal value must be a number".to_string()))
        .transpose()?;
    let rate = rate
        .map(|v| parse_value(v).ok_or_else(|| "Rate must be a number".to_string()))
        .transpose()?;

    let runits = form.value(CreateGoalForm::RATE_UNITS).trim();
    let runits = if runits.is_empty() { "d" } else { runits };

    Ok(NewGoal {
        slug: slug.to_string(),
        title: title.to_string(),
        goal_type: goal_type.to_string(),
        gunits: gunits.to_string(),
        goaldate,
        goalval,
        rate,
        runits: runits.to_string(),
    })
}
