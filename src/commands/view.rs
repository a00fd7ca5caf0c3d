use jiff::Timestamp;
use owo_colors::OwoColorize;
use serde_json::json;

use super::{connect, goal_to_json, print_json, runtime, tier_colored};
use crate::error::Result;
use crate::remote::GoalService;
use crate::types::{Datapoint, GoalDetail};
use crate::utils::{format_due, format_pledge};

/// Datapoints listed by `buzz view`
const RECENT_DATAPOINTS: usize = 10;

/// Show one goal with its recent datapoints (`buzz view`)
pub fn cmd_view(slug: &str, output_json: bool) -> Result<()> {
    let client = connect()?;
    let detail = runtime()?.block_on(client.fetch_goal(slug))?;

    if output_json {
        let mut value = goal_to_json(&detail.goal);
        value["datapoints"] = json!(
            recent(&detail)
                .iter()
                .map(|dp| json!({
                    "id": dp.id,
                    "value": dp.value,
                    "comment": dp.comment,
                    "daystamp": dp.daystamp,
                }))
                .collect::<Vec<_>>()
        );
        return print_json(&value);
    }

    let goal = &detail.goal;
    println!(
        "{} - {}",
        tier_colored(&goal.slug, goal.tier()).bold(),
        goal.title
    );
    println!();
    println!("{:10} {}", "Due:".dimmed(), format_due(goal.losedate, Timestamp::now()));
    println!("{:10} {}d ({})", "Buffer:".dimmed(), goal.safebuf, goal.tier());
    println!("{:10} {}", "Pledge:".dimmed(), format_pledge(goal.pledge));
    if !goal.baremin.is_empty() {
        println!("{:10} {}", "Bare min:".dimmed(), goal.baremin);
    }
    if !goal.limsum.is_empty() {
        println!("{:10} {}", "Needed:".dimmed(), goal.limsum);
    }
    if let Some(rate) = goal.rate {
        println!("{:10} {} {}/{}", "Rate:".dimmed(), rate, goal.gunits, goal.runits);
    }

    let datapoints = recent(&detail);
    println!();
    if datapoints.is_empty() {
        println!("{}", "No datapoints".dimmed());
        return Ok(());
    }
    println!("{}", "Recent datapoints".bold());
    for dp in datapoints {
        println!("  {}  {:>8}  {}", dp.daystamp, dp.value, dp.comment.dimmed());
    }
    Ok(())
}

/// Newest datapoints first, at most [`RECENT_DATAPOINTS`]
fn recent(detail: &GoalDetail) -> Vec<&Datapoint> {
    let mut datapoints: Vec<&Datapoint> = detail.datapoints.iter().collect();
    datapoints.sort_by(|a, b| b.daystamp.cmp(&a.daystamp));
    datapoints.truncate(RECENT_DATAPOINTS);
    datapoints
}
