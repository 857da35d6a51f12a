//! Innings Transition Manager
//!
//! Runs once: closes innings 1, fixes the target and hands the swapped
//! rosters to a fresh opening selection.

use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::models::MatchSetup;

use super::innings::{InningsRules, InningsState};
use super::opening::OpeningSelection;

/// Runs needed to win: one more than the first innings total.
pub fn target_for(first: &InningsState) -> u32 {
    first.total_runs + 1
}

/// Fixed parameters of innings `number`, with the wicket cap from config.
pub fn innings_rules(
    setup: &MatchSetup,
    number: u8,
    config: &ScoringConfig,
    target: Option<u32>,
) -> InningsRules {
    let batting_side = setup.batting_side(number);
    let batting = setup.roster(batting_side);
    InningsRules {
        number,
        batting_side,
        bowling_side: batting_side.opponent(),
        batting_roster_size: batting.len() as u32,
        max_wickets: batting.max_wickets(config.max_wickets_cap),
        match_overs: setup.match_overs,
        target,
    }
}

/// Computes the target from a completed first innings and opens selection
/// for the chase.
pub fn begin_second_innings(
    setup: &MatchSetup,
    first: &InningsState,
) -> Result<(u32, OpeningSelection)> {
    if first.number() != 1 || !first.is_complete {
        return Err(ScoringError::illegal("first innings is still in progress"));
    }
    let target = target_for(first);
    let selection = OpeningSelection::new(setup, 2)?;
    log::info!(
        "Innings break: {} need {} from {} overs",
        setup.team_name(selection.batting_side),
        target,
        setup.match_overs
    );
    Ok((target, selection))
}
