//! Roster & Toss Resolver
//!
//! Turns the raw setup-screen input into a `MatchSetup`: both rosters with
//! dense player ids (home first, then away) and the settled toss.

use rand::Rng;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{Result, ScoringError};
use crate::models::{
    CoinFace, MatchSetup, Player, PlayerEntry, PlayerId, Roster, RosterInput, TeamSide, TossInput,
    TossOutcome,
};

/// Builds one side's roster. Names are trimmed and blank entries dropped;
/// ids continue from `first_id`.
pub fn build_roster(
    side: TeamSide,
    team_name: &str,
    entries: &[PlayerEntry],
    first_id: u16,
) -> Result<Roster> {
    let team_name = team_name.trim();
    if team_name.is_empty() {
        return Err(ScoringError::InvalidRoster(format!("{side} team has no name")));
    }

    let mut seen = HashSet::new();
    let mut players = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.name().trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.to_string()) {
            return Err(ScoringError::InvalidRoster(format!(
                "duplicate player name '{name}' in {team_name}"
            )));
        }
        let index = u16::try_from(players.len())
            .ok()
            .and_then(|n| first_id.checked_add(n))
            .ok_or_else(|| ScoringError::InvalidRoster(format!("{team_name} roster is too large")))?;
        let account_ref = entry.account_ref().map(str::to_string);
        players.push(Player {
            id: PlayerId(index),
            name: name.to_string(),
            side,
            has_account: account_ref.is_some(),
            account_ref,
        });
    }

    if players.is_empty() {
        return Err(ScoringError::InvalidRoster(format!("{team_name} has no players")));
    }

    Ok(Roster { side, team_name: team_name.to_string(), players })
}

/// Fair coin, independent of anything the caller controls.
pub fn draw_coin<R: Rng + ?Sized>(rng: &mut R) -> CoinFace {
    if rng.gen_bool(0.5) {
        CoinFace::Heads
    } else {
        CoinFace::Tails
    }
}

pub fn resolve_toss<R: Rng + ?Sized>(toss: &TossInput, rng: &mut R) -> TossOutcome {
    match *toss {
        TossInput::Manual { winner, decision } => {
            TossOutcome { winner, decision, call: None, coin: None }
        }
        TossInput::Random { calling_side, call, winner_decision, result } => {
            let coin = result.unwrap_or_else(|| draw_coin(rng));
            let winner = if coin == call { calling_side } else { calling_side.opponent() };
            TossOutcome { winner, decision: winner_decision, call: Some(call), coin: Some(coin) }
        }
    }
}

/// Validates the input and produces the read-only match setup.
pub fn resolve_match_setup<R: Rng + ?Sized>(
    match_id: Uuid,
    input: &RosterInput,
    toss: &TossInput,
    rng: &mut R,
) -> Result<MatchSetup> {
    if input.match_overs == 0 {
        return Err(ScoringError::InvalidMatchOvers(input.match_overs));
    }

    let home = build_roster(TeamSide::Home, &input.my_team_name, &input.my_team_players, 0)?;
    let away_first = u16::try_from(home.len())
        .map_err(|_| ScoringError::InvalidRoster("home roster is too large".to_string()))?;
    let away = build_roster(
        TeamSide::Away,
        &input.opponent_team_name,
        &input.opponent_team_players,
        away_first,
    )?;

    let toss = resolve_toss(toss, rng);
    let first_batting = toss.first_batting();
    log::info!(
        "Toss: {} won and chose to {:?}; {} bat first",
        match toss.winner {
            TeamSide::Home => &home.team_name,
            TeamSide::Away => &away.team_name,
        },
        toss.decision,
        first_batting
    );

    Ok(MatchSetup {
        match_id,
        home,
        away,
        match_overs: input.match_overs,
        toss,
        first_batting,
        first_bowling: first_batting.opponent(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TossDecision;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn input(home: &[&str], away: &[&str], overs: u32) -> RosterInput {
        RosterInput {
            my_team_name: "Lions".to_string(),
            opponent_team_name: "Tigers".to_string(),
            my_team_players: home.iter().map(|&n| n.into()).collect(),
            opponent_team_players: away.iter().map(|&n| n.into()).collect(),
            match_overs: overs,
        }
    }

    fn manual(winner: TeamSide, decision: TossDecision) -> TossInput {
        TossInput::Manual { winner, decision }
    }

    #[test]
    fn test_ids_are_dense_home_then_away() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let setup = resolve_match_setup(
            Uuid::nil(),
            &input(&["A", " ", "B", "C"], &["X", "Y"], 5),
            &manual(TeamSide::Home, TossDecision::Bat),
            &mut rng,
        )
        .unwrap();

        assert_eq!(setup.home.ids(), vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
        assert_eq!(setup.away.ids(), vec![PlayerId(3), PlayerId(4)]);
        assert_eq!(setup.player_name(PlayerId(1)), "B");
        assert_eq!(setup.player_name(PlayerId(4)), "Y");
        assert_eq!(setup.player(PlayerId(4)).map(|p| p.side), Some(TeamSide::Away));
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let toss = manual(TeamSide::Home, TossDecision::Bat);

        let err = resolve_match_setup(Uuid::nil(), &input(&["A"], &["X"], 0), &toss, &mut rng);
        assert_eq!(err.unwrap_err(), ScoringError::InvalidMatchOvers(0));

        let err = resolve_match_setup(Uuid::nil(), &input(&["A", "A"], &["X"], 2), &toss, &mut rng);
        assert!(matches!(err, Err(ScoringError::InvalidRoster(_))));

        let err = resolve_match_setup(Uuid::nil(), &input(&["A"], &["  "], 2), &toss, &mut rng);
        assert!(matches!(err, Err(ScoringError::InvalidRoster(_))));
    }

    #[test]
    fn test_same_name_on_both_sides_is_fine() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let setup = resolve_match_setup(
            Uuid::nil(),
            &input(&["Sam", "Ali"], &["Sam", "Joe"], 2),
            &manual(TeamSide::Home, TossDecision::Bat),
            &mut rng,
        )
        .unwrap();
        assert_ne!(setup.find_player(TeamSide::Home, "Sam"), setup.find_player(TeamSide::Away, "Sam"));
    }

    #[test]
    fn test_manual_toss() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = resolve_toss(&manual(TeamSide::Away, TossDecision::Bowl), &mut rng);
        assert_eq!(outcome.first_batting(), TeamSide::Home);
        assert_eq!(outcome.coin, None);
    }

    #[test]
    fn test_random_toss_caller_wins_on_matching_call() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let toss = TossInput::Random {
            calling_side: TeamSide::Away,
            call: CoinFace::Heads,
            winner_decision: TossDecision::Bat,
            result: Some(CoinFace::Heads),
        };
        let outcome = resolve_toss(&toss, &mut rng);
        assert_eq!(outcome.winner, TeamSide::Away);
        assert_eq!(outcome.first_batting(), TeamSide::Away);

        let toss = TossInput::Random {
            calling_side: TeamSide::Away,
            call: CoinFace::Heads,
            winner_decision: TossDecision::Bowl,
            result: Some(CoinFace::Tails),
        };
        let outcome = resolve_toss(&toss, &mut rng);
        assert_eq!(outcome.winner, TeamSide::Home);
        assert_eq!(outcome.first_batting(), TeamSide::Away);
    }

    #[test]
    fn test_drawn_coin_is_roughly_fair() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let heads = (0..2000).filter(|_| draw_coin(&mut rng) == CoinFace::Heads).count();
        assert!((800..1200).contains(&heads), "heads = {heads}");
    }
}
