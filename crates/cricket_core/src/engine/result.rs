//! Match Result Evaluator
//!
//! Decides the result once the chase is over, ranks the man-of-the-match
//! candidates and assembles the immutable `MatchSummary`.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::config::{ManOfTheMatchWeights, ScoringConfig};
use crate::error::{Result, ScoringError};
use crate::models::{
    Margin, MatchResult, MatchSetup, MatchSummary, MotmCandidate, PlayerId, ScoringCommand,
    TeamSide,
};

use super::innings::InningsState;

/// Result of a completed second innings.
///
/// | chase                      | result                          |
/// |----------------------------|---------------------------------|
/// | `total >= target`          | chasing side by wickets in hand |
/// | `total <  target - 1`      | defending side by runs          |
/// | `total == target - 1`      | `Draw`                          |
pub fn evaluate_result(second: &InningsState) -> Result<MatchResult> {
    let Some(target) = second.rules.target else {
        return Err(ScoringError::illegal("result needs a second innings with a target"));
    };
    if !second.is_complete {
        return Err(ScoringError::illegal("second innings is still in progress"));
    }

    let total = second.total_runs;
    let result = if total >= target {
        MatchResult::SecondSideWins {
            margin: Margin::Wickets(second.rules.max_wickets.saturating_sub(second.wickets_lost)),
        }
    } else if total + 1 < target {
        MatchResult::FirstSideWins { margin: Margin::Runs(target - 1 - total) }
    } else {
        MatchResult::Draw
    };
    Ok(result)
}

/// Impact score of every player who batted or bowled, best first.
///
/// Ties go to the winning side, then to the lower player id.
pub fn rank_candidates(
    setup: &MatchSetup,
    innings: &[InningsState],
    weights: &ManOfTheMatchWeights,
    winner: Option<TeamSide>,
) -> Vec<MotmCandidate> {
    #[derive(Default)]
    struct Tally {
        runs: u32,
        wickets: u32,
        maidens: u32,
    }

    let mut tallies: BTreeMap<PlayerId, Tally> = BTreeMap::new();
    for inn in innings {
        for (&id, bat) in &inn.batter_figures {
            tallies.entry(id).or_default().runs += bat.runs_scored;
        }
        for (&id, bowl) in &inn.bowler_figures {
            let tally = tallies.entry(id).or_default();
            tally.wickets += bowl.wickets_taken;
            tally.maidens += bowl.maidens;
        }
    }

    let mut candidates: Vec<MotmCandidate> = tallies
        .into_iter()
        .map(|(id, t)| MotmCandidate {
            player: id,
            name: setup.player_name(id).to_string(),
            side: setup.player(id).map(|p| p.side).unwrap_or_default(),
            runs: t.runs,
            wickets: t.wickets,
            maidens: t.maidens,
            impact: weights
                .run_weight
                .saturating_mul(t.runs)
                .saturating_add(weights.wicket_weight.saturating_mul(t.wickets))
                .saturating_add(weights.maiden_weight.saturating_mul(t.maidens)),
        })
        .collect();

    candidates.sort_by_key(|c| (Reverse(c.impact), Some(c.side) != winner, c.player));
    candidates
}

/// Assembles the terminal record from the closed innings.
pub fn build_summary(
    setup: &MatchSetup,
    innings: &[InningsState],
    target: Option<u32>,
    result: MatchResult,
    config: &ScoringConfig,
    commands: Vec<ScoringCommand>,
) -> MatchSummary {
    let winner = result.winner(setup.first_batting);
    let candidates = rank_candidates(setup, innings, &config.man_of_the_match, winner);
    let man_of_the_match = match result {
        MatchResult::NoResult { .. } => None,
        _ => candidates.first().map(|c| c.player),
    };
    let result_text = result.describe(setup);
    log::info!("Match {}: {}", setup.match_id, result_text);

    MatchSummary {
        match_id: setup.match_id,
        setup: setup.clone(),
        innings: innings.iter().map(|inn| inn.summarize(setup)).collect(),
        target,
        result,
        winner,
        result_text,
        man_of_the_match,
        candidates,
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::innings::tests::{lineup, rules};
    use crate::engine::toss::resolve_match_setup;
    use crate::models::{
        BallOutcome, BowlerFigures, PlayerEntry, RosterInput, TossDecision, TossInput,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uuid::Uuid;

    fn chase(target: u32, total: u32, wickets: u32, complete: bool) -> InningsState {
        let mut inn = InningsState::open(rules(20, 11, Some(target)), lineup());
        inn.total_runs = total;
        inn.wickets_lost = wickets;
        inn.is_complete = complete;
        inn
    }

    fn setup() -> MatchSetup {
        let input = RosterInput {
            my_team_name: "Lions".to_string(),
            opponent_team_name: "Tigers".to_string(),
            my_team_players: (0..11).map(|i| PlayerEntry::Name(format!("H{i}"))).collect(),
            opponent_team_players: (0..11).map(|i| PlayerEntry::Name(format!("A{i}"))).collect(),
            match_overs: 20,
        };
        let toss = TossInput::Manual { winner: TeamSide::Home, decision: TossDecision::Bat };
        resolve_match_setup(Uuid::nil(), &input, &toss, &mut ChaCha8Rng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn test_chase_won_by_wickets_in_hand() {
        let result = evaluate_result(&chase(151, 151, 6, true)).unwrap();
        assert_eq!(result, MatchResult::SecondSideWins { margin: Margin::Wickets(4) });
    }

    #[test]
    fn test_defended_by_runs() {
        let result = evaluate_result(&chase(141, 120, 10, true)).unwrap();
        assert_eq!(result, MatchResult::FirstSideWins { margin: Margin::Runs(20) });
    }

    #[test]
    fn test_level_scores_draw() {
        assert_eq!(evaluate_result(&chase(141, 140, 3, true)).unwrap(), MatchResult::Draw);
    }

    #[test]
    fn test_result_needs_finished_chase() {
        assert!(evaluate_result(&chase(141, 100, 3, false)).is_err());
        let first = InningsState::open(rules(20, 11, None), lineup());
        assert!(evaluate_result(&first).is_err());
    }

    #[test]
    fn test_candidates_rank_by_impact_then_winner_then_id() {
        let setup = setup();
        let mut first = InningsState::open(rules(20, 11, None), lineup());
        first.apply_ball(&BallOutcome::runs(4), 7).unwrap();
        first.bowler_figures.insert(
            PlayerId(11),
            BowlerFigures { wickets_taken: 1, ..Default::default() },
        );
        first.bowler_figures.insert(PlayerId(12), BowlerFigures { maidens: 4, ..Default::default() });

        let weights = ManOfTheMatchWeights::default();
        let ranked = rank_candidates(&setup, &[first.clone()], &weights, Some(TeamSide::Away));
        let order: Vec<u32> = ranked.iter().map(|c| c.player.0 as u32).collect();
        // 11: 20, 12: 20, 0: 4, 1: 0
        assert_eq!(order, vec![11, 12, 0, 1]);
        assert_eq!(ranked[0].impact, 20);

        // equal impact across sides goes to the winner
        first.batter_figures.get_mut(&PlayerId(0)).unwrap().runs_scored = 20;
        let ranked = rank_candidates(&setup, &[first.clone()], &weights, Some(TeamSide::Home));
        assert_eq!(ranked[0].player, PlayerId(0));
        let ranked = rank_candidates(&setup, &[first], &weights, Some(TeamSide::Away));
        assert_eq!(ranked[0].player, PlayerId(11));
    }
}
