//! Opening Selection
//!
//! Striker, then non-striker, then opening bowler. Each step can be stepped
//! back one at a time; re-picking an earlier step clears everything after it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::models::{MatchSetup, PlayerId, TeamSide};

use super::innings::OpeningLineup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningStep {
    Striker,
    NonStriker,
    Bowler,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningSelection {
    pub innings_number: u8,
    pub batting_side: TeamSide,
    pub bowling_side: TeamSide,
    batting: Vec<PlayerId>,
    bowling: Vec<PlayerId>,
    striker: Option<PlayerId>,
    non_striker: Option<PlayerId>,
    bowler: Option<PlayerId>,
}

impl OpeningSelection {
    /// Fails with `InsufficientPlayers` when the batting side cannot field
    /// two openers or the bowling side has nobody to bowl.
    pub fn new(setup: &MatchSetup, innings_number: u8) -> Result<Self> {
        let batting_side = setup.batting_side(innings_number);
        let bowling_side = batting_side.opponent();
        let batting = setup.roster(batting_side).ids();
        let bowling = setup.roster(bowling_side).ids();

        if batting.len() < 2 {
            return Err(ScoringError::InsufficientPlayers {
                side: batting_side,
                needed: 2,
                available: batting.len(),
            });
        }
        if bowling.is_empty() {
            return Err(ScoringError::InsufficientPlayers {
                side: bowling_side,
                needed: 1,
                available: 0,
            });
        }

        Ok(Self {
            innings_number,
            batting_side,
            bowling_side,
            batting,
            bowling,
            striker: None,
            non_striker: None,
            bowler: None,
        })
    }

    pub fn step(&self) -> OpeningStep {
        match (self.striker, self.non_striker, self.bowler) {
            (None, _, _) => OpeningStep::Striker,
            (Some(_), None, _) => OpeningStep::NonStriker,
            (Some(_), Some(_), None) => OpeningStep::Bowler,
            (Some(_), Some(_), Some(_)) => OpeningStep::Ready,
        }
    }

    pub fn striker(&self) -> Option<PlayerId> {
        self.striker
    }

    pub fn non_striker(&self) -> Option<PlayerId> {
        self.non_striker
    }

    pub fn bowler(&self) -> Option<PlayerId> {
        self.bowler
    }

    /// Candidates for the step currently awaiting input.
    pub fn candidates(&self) -> Vec<PlayerId> {
        match self.step() {
            OpeningStep::Striker => self.batting.clone(),
            OpeningStep::NonStriker => {
                self.batting.iter().copied().filter(|&id| Some(id) != self.striker).collect()
            }
            OpeningStep::Bowler => self.bowling.clone(),
            OpeningStep::Ready => Vec::new(),
        }
    }

    pub fn select_striker(&mut self, player: PlayerId) -> Result<()> {
        self.require_batting(player)?;
        self.striker = Some(player);
        self.non_striker = None;
        self.bowler = None;
        Ok(())
    }

    pub fn select_non_striker(&mut self, player: PlayerId) -> Result<()> {
        let Some(striker) = self.striker else {
            return Err(ScoringError::illegal("select the striker before the non-striker"));
        };
        self.require_batting(player)?;
        if player == striker {
            return Err(ScoringError::DuplicateSelection(format!(
                "{player} is already the striker"
            )));
        }
        self.non_striker = Some(player);
        self.bowler = None;
        Ok(())
    }

    pub fn select_bowler(&mut self, player: PlayerId) -> Result<()> {
        if self.non_striker.is_none() {
            return Err(ScoringError::illegal("select both batters before the bowler"));
        }
        if !self.bowling.contains(&player) {
            return Err(ScoringError::InvalidSelection(format!(
                "{player} is not in the {} bowling roster",
                self.bowling_side
            )));
        }
        self.bowler = Some(player);
        Ok(())
    }

    /// Clears the most recent selection.
    pub fn back(&mut self) -> Result<()> {
        let cleared = self.bowler.take().is_some()
            || self.non_striker.take().is_some()
            || self.striker.take().is_some();
        if cleared {
            Ok(())
        } else {
            Err(ScoringError::illegal("no opening selection to undo"))
        }
    }

    pub fn lineup(&self) -> Result<OpeningLineup> {
        match (self.striker, self.non_striker, self.bowler) {
            (Some(striker), Some(non_striker), Some(bowler)) => {
                Ok(OpeningLineup { striker, non_striker, bowler })
            }
            _ => Err(ScoringError::illegal(format!(
                "opening selection incomplete, awaiting {:?}",
                self.step()
            ))),
        }
    }

    fn require_batting(&self, player: PlayerId) -> Result<()> {
        if self.batting.contains(&player) {
            Ok(())
        } else {
            Err(ScoringError::InvalidSelection(format!(
                "{player} is not in the {} batting roster",
                self.batting_side
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::toss::resolve_match_setup;
    use crate::models::{RosterInput, TossDecision, TossInput};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uuid::Uuid;

    fn setup(home: &[&str], away: &[&str]) -> MatchSetup {
        let input = RosterInput {
            my_team_name: "Lions".to_string(),
            opponent_team_name: "Tigers".to_string(),
            my_team_players: home.iter().map(|&n| n.into()).collect(),
            opponent_team_players: away.iter().map(|&n| n.into()).collect(),
            match_overs: 2,
        };
        let toss = TossInput::Manual { winner: TeamSide::Home, decision: TossDecision::Bat };
        resolve_match_setup(Uuid::nil(), &input, &toss, &mut ChaCha8Rng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn test_full_selection() {
        let mut sel = OpeningSelection::new(&setup(&["A", "B", "C"], &["X", "Y"]), 1).unwrap();
        assert_eq!(sel.step(), OpeningStep::Striker);
        sel.select_striker(PlayerId(0)).unwrap();
        assert_eq!(sel.candidates(), vec![PlayerId(1), PlayerId(2)]);
        sel.select_non_striker(PlayerId(2)).unwrap();
        sel.select_bowler(PlayerId(4)).unwrap();

        let lineup = sel.lineup().unwrap();
        assert_eq!(lineup.striker, PlayerId(0));
        assert_eq!(lineup.non_striker, PlayerId(2));
        assert_eq!(lineup.bowler, PlayerId(4));
    }

    #[test]
    fn test_same_player_for_both_ends_is_rejected() {
        let mut sel = OpeningSelection::new(&setup(&["A", "B"], &["X"]), 1).unwrap();
        sel.select_striker(PlayerId(0)).unwrap();
        let err = sel.select_non_striker(PlayerId(0)).unwrap_err();
        assert!(matches!(err, ScoringError::DuplicateSelection(_)));
        assert_eq!(sel.non_striker(), None);
    }

    #[test]
    fn test_wrong_side_and_out_of_order() {
        let mut sel = OpeningSelection::new(&setup(&["A", "B"], &["X"]), 1).unwrap();
        assert!(matches!(sel.select_striker(PlayerId(2)), Err(ScoringError::InvalidSelection(_))));
        assert!(matches!(
            sel.select_bowler(PlayerId(2)),
            Err(ScoringError::IllegalStateTransition(_))
        ));
        sel.select_striker(PlayerId(0)).unwrap();
        sel.select_non_striker(PlayerId(1)).unwrap();
        assert!(matches!(sel.select_bowler(PlayerId(1)), Err(ScoringError::InvalidSelection(_))));
        assert!(sel.lineup().is_err());
    }

    #[test]
    fn test_back_clears_only_the_latest_step() {
        let mut sel = OpeningSelection::new(&setup(&["A", "B", "C"], &["X"]), 1).unwrap();
        sel.select_striker(PlayerId(0)).unwrap();
        sel.select_non_striker(PlayerId(1)).unwrap();
        sel.select_bowler(PlayerId(3)).unwrap();

        sel.back().unwrap();
        assert_eq!(sel.step(), OpeningStep::Bowler);
        assert_eq!(sel.non_striker(), Some(PlayerId(1)));

        sel.back().unwrap();
        assert_eq!(sel.step(), OpeningStep::NonStriker);
        assert_eq!(sel.striker(), Some(PlayerId(0)));

        sel.back().unwrap();
        assert!(sel.back().is_err());
    }

    #[test]
    fn test_reselecting_striker_clears_downstream() {
        let mut sel = OpeningSelection::new(&setup(&["A", "B", "C"], &["X"]), 1).unwrap();
        sel.select_striker(PlayerId(0)).unwrap();
        sel.select_non_striker(PlayerId(1)).unwrap();
        sel.select_striker(PlayerId(1)).unwrap();
        assert_eq!(sel.non_striker(), None);
        assert_eq!(sel.step(), OpeningStep::NonStriker);
    }

    #[test]
    fn test_insufficient_players() {
        let err = OpeningSelection::new(&setup(&["A"], &["X", "Y"]), 1).unwrap_err();
        assert_eq!(
            err,
            ScoringError::InsufficientPlayers { side: TeamSide::Home, needed: 2, available: 1 }
        );
        // second innings: the single-player side bowls, which is fine
        assert!(OpeningSelection::new(&setup(&["A"], &["X", "Y"]), 2).is_ok());
    }
}
