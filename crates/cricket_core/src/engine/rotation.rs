//! Over/Bowler Rotation Manager

use crate::error::{Result, ScoringError};
use crate::models::{BowlerFigures, PlayerId, Roster};

use super::innings::InningsState;

/// Bowlers allowed to take the next over, in roster order.
///
/// The bowler who just finished is always out. The bowler of the over
/// before is also left out unless that would leave nobody, which lets a
/// two-man attack alternate.
pub fn eligible_bowlers(innings: &InningsState, bowling_roster: &Roster) -> Vec<PlayerId> {
    let just_finished = innings.current_bowler;
    let without_last: Vec<PlayerId> = bowling_roster
        .players
        .iter()
        .map(|p| p.id)
        .filter(|&id| id != just_finished)
        .collect();

    let Some(before) = innings.previous_over_bowler else {
        return without_last;
    };
    let without_both: Vec<PlayerId> =
        without_last.iter().copied().filter(|&id| id != before).collect();
    if without_both.is_empty() {
        without_last
    } else {
        without_both
    }
}

/// Hands the next over to `player`.
pub fn apply_next_bowler(
    innings: &mut InningsState,
    player: PlayerId,
    bowling_roster: &Roster,
) -> Result<()> {
    if innings.is_complete {
        return Err(ScoringError::illegal("innings is complete"));
    }
    if innings.balls_in_current_over != 0 || innings.completed_overs == 0 {
        return Err(ScoringError::illegal("bowler can only change between overs"));
    }
    if !bowling_roster.contains(player) {
        return Err(ScoringError::InvalidSelection(format!(
            "{player} is not in the {} bowling roster",
            bowling_roster.side
        )));
    }

    let eligible = eligible_bowlers(innings, bowling_roster);
    if eligible.is_empty() {
        return Err(ScoringError::NoEligibleBowler);
    }
    if !eligible.contains(&player) {
        return Err(ScoringError::DuplicateSelection(format!(
            "{player} bowled one of the last two overs"
        )));
    }

    innings.previous_over_bowler = Some(innings.current_bowler);
    innings.current_bowler = player;
    if !innings.bowler_figures.contains_key(&player) {
        innings.bowler_figures.insert(player, BowlerFigures::default());
        innings.bowling_order.push(player);
    }
    log::debug!(
        "Over {}: {} takes over from {}",
        innings.completed_overs + 1,
        player,
        innings.previous_over_bowler.map_or_else(String::new, |p| p.to_string())
    );
    Ok(())
}
