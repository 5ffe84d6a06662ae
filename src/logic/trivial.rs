//! Trivial elimination: some team already has more wins than the candidate can reach.

use crate::models::{Division, DivisionError};

/// Teams (in division order) whose current wins exceed `team`'s maximum possible wins.
/// Non-empty means `team` is eliminated; any one of them is a certificate on its own.
pub fn trivial_elimination(division: &Division, team: &str) -> Result<Vec<String>, DivisionError> {
    let max_wins = division.team(team)?.max_possible_wins();
    Ok(division
        .team_records()
        .iter()
        .filter(|t| u64::from(t.wins) > max_wins)
        .map(|t| t.name.clone())
        .collect())
}
