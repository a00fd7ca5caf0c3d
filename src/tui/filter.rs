//! Fuzzy filtering of the goal grid.
//!
//! A pattern matches when its characters appear in order, case-insensitively,
//! in the slug or the title. Matching never reorders goals.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::types::Goal;

/// A goal that survived the filter, with the title characters to highlight
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredGoal<'a> {
    /// Position in the unfiltered list
    pub index: usize,
    pub goal: &'a Goal,
    pub title_indices: Vec<usize>,
}

fn matcher() -> SkimMatcherV2 {
    SkimMatcherV2::default().ignore_case()
}

/// Lowercase `text` with full Unicode case mapping. Each char of the folded
/// text is paired with the index of the original char it came from, since one
/// char may fold to several.
fn fold(text: &str) -> (String, Vec<usize>) {
    let mut folded = String::with_capacity(text.len());
    let mut origins = Vec::with_capacity(text.len());
    for (index, c) in text.chars().enumerate() {
        for lower in c.to_lowercase() {
            folded.push(lower);
            origins.push(index);
        }
    }
    (folded, origins)
}

fn matches(matcher: &SkimMatcherV2, folded_pattern: &str, text: &str) -> bool {
    !text.is_empty() && matcher.fuzzy_match(&fold(text).0, folded_pattern).is_some()
}

/// Case-insensitive subsequence test. An empty pattern matches everything; a
/// non-empty pattern never matches empty text.
pub fn fuzzy_match(pattern: &str, text: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    matches(&matcher(), &fold(pattern).0, text)
}

/// Character indices of `title` matched by `pattern`, for highlighting.
pub fn title_indices(pattern: &str, title: &str) -> Vec<usize> {
    if pattern.is_empty() || title.is_empty() {
        return Vec::new();
    }
    let (folded, origins) = fold(title);
    let Some((_, indices)) = matcher().fuzzy_indices(&folded, &fold(pattern).0) else {
        return Vec::new();
    };
    let mut positions: Vec<usize> = indices
        .into_iter()
        .filter_map(|i| origins.get(i).copied())
        .collect();
    positions.dedup();
    positions
}

/// Unfiltered positions of the goals shown for `query`, in order.
pub fn displayed_indices(goals: &[Goal], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..goals.len()).collect();
    }
    let matcher = matcher();
    let pattern = fold(query).0;
    goals
        .iter()
        .enumerate()
        .filter(|(_, goal)| {
            matches(&matcher, &pattern, &goal.slug) || matches(&matcher, &pattern, &goal.title)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Goals shown for `query`, in their original order, with title highlights.
pub fn displayed_goals<'a>(goals: &'a [Goal], query: &str) -> Vec<FilteredGoal<'a>> {
    displayed_indices(goals, query)
        .into_iter()
        .map(|index| {
            let goal = &goals[index];
            FilteredGoal {
                index,
                goal,
                title_indices: title_indices(query, &goal.title),
            }
        })
        .collect()
}
