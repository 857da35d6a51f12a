//! Ball Outcome Processor
//!
//! `InningsState` is the live state of one innings. Every ball goes through
//! [`InningsState::apply_ball`], which works on a clone, checks the
//! invariants and only then commits, so a rejected ball leaves the innings
//! exactly as it was.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::MAX_WICKETS;
use crate::error::{InvariantCheck, Result, ScoringError};
use crate::models::{
    BallOutcome, BatterEnd, BatterFigures, BattingLine, BowlerFigures, BowlingLine, ExtraType,
    Extras, FallOfWicket, InningsEnd, InningsSummary, MatchSetup, OverCount, PlayerId, Roster,
    TeamSide, BALLS_PER_OVER,
};

/// Fixed parameters of an innings, decided before its first ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsRules {
    pub number: u8,
    pub batting_side: TeamSide,
    pub bowling_side: TeamSide,
    pub batting_roster_size: u32,
    /// `min(cap, batting_roster_size - 1)`
    pub max_wickets: u32,
    pub match_overs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

/// Openers and opening bowler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningLineup {
    pub striker: PlayerId,
    pub non_striker: PlayerId,
    pub bowler: PlayerId,
}

/// What one applied ball did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallReport {
    pub legal: bool,
    pub runs_to_total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wicket: Option<PlayerId>,
    pub over_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub innings_end: Option<InningsEnd>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsState {
    pub rules: InningsRules,
    pub total_runs: u32,
    pub wickets_lost: u32,
    pub completed_overs: u32,
    /// Legal balls in the over in progress, always < 6
    pub balls_in_current_over: u32,
    /// Empty after a wicket until the next batter walks in
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub current_bowler: PlayerId,
    pub previous_over_bowler: Option<PlayerId>,
    pub batter_figures: BTreeMap<PlayerId, BatterFigures>,
    pub bowler_figures: BTreeMap<PlayerId, BowlerFigures>,
    /// Order of appearance at the crease
    pub batting_order: Vec<PlayerId>,
    /// Order of first over bowled
    pub bowling_order: Vec<PlayerId>,
    pub extras: Extras,
    pub fall_of_wickets: Vec<FallOfWicket>,
    /// Runs charged to the bowler in the over in progress (maiden check)
    pub runs_in_current_over: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<InningsEnd>,
    pub is_complete: bool,
}

impl InningsState {
    pub fn open(rules: InningsRules, lineup: OpeningLineup) -> Self {
        let mut batter_figures = BTreeMap::new();
        batter_figures.insert(lineup.striker, BatterFigures::default());
        batter_figures.insert(lineup.non_striker, BatterFigures::default());
        let mut bowler_figures = BTreeMap::new();
        bowler_figures.insert(lineup.bowler, BowlerFigures::default());

        Self {
            rules,
            total_runs: 0,
            wickets_lost: 0,
            completed_overs: 0,
            balls_in_current_over: 0,
            striker: Some(lineup.striker),
            non_striker: Some(lineup.non_striker),
            current_bowler: lineup.bowler,
            previous_over_bowler: None,
            batter_figures,
            bowler_figures,
            batting_order: vec![lineup.striker, lineup.non_striker],
            bowling_order: vec![lineup.bowler],
            extras: Extras::default(),
            fall_of_wickets: Vec::new(),
            runs_in_current_over: 0,
            end_reason: None,
            is_complete: false,
        }
    }

    // ========== Derived values ==========

    #[inline]
    pub fn number(&self) -> u8 {
        self.rules.number
    }

    #[inline]
    pub fn batting_side(&self) -> TeamSide {
        self.rules.batting_side
    }

    #[inline]
    pub fn bowling_side(&self) -> TeamSide {
        self.rules.bowling_side
    }

    pub fn legal_balls(&self) -> u32 {
        self.completed_overs * BALLS_PER_OVER + self.balls_in_current_over
    }

    pub fn overs(&self) -> OverCount {
        OverCount::from_balls(self.legal_balls())
    }

    pub fn balls_remaining(&self) -> u32 {
        (self.rules.match_overs * BALLS_PER_OVER).saturating_sub(self.legal_balls())
    }

    /// Runs still needed in a chase.
    pub fn runs_required(&self) -> Option<u32> {
        self.rules.target.map(|t| t.saturating_sub(self.total_runs))
    }

    /// A wicket has left an end empty.
    pub fn needs_batter(&self) -> bool {
        !self.is_complete && (self.striker.is_none() || self.non_striker.is_none())
    }

    /// Runs off the bat across all batters. With extras this reconciles to the total.
    pub fn batter_runs_total(&self) -> u32 {
        self.batter_figures.values().map(|f| f.runs_scored).sum()
    }

    // ========== Transitions ==========

    /// Applies one delivery atomically.
    pub fn apply_ball(&mut self, ball: &BallOutcome, max_runs_per_ball: u32) -> Result<BallReport> {
        if self.is_complete {
            return Err(ScoringError::illegal(format!(
                "innings {} is already complete",
                self.rules.number
            )));
        }
        ball.validate(max_runs_per_ball)?;

        let mut next = self.clone();
        let report = next.apply_unchecked(ball)?;
        next.validate_invariants()?;
        *self = next;

        log::debug!(
            "Innings {}: {} ({}) after {:?}",
            self.rules.number,
            self.score_line(),
            self.overs(),
            ball
        );
        if let Some(reason) = report.innings_end {
            log::info!(
                "Innings {} closed on {} ({}): {:?}",
                self.rules.number,
                self.score_line(),
                self.overs(),
                reason
            );
        }
        Ok(report)
    }

    fn apply_unchecked(&mut self, ball: &BallOutcome) -> Result<BallReport> {
        let striker = self
            .striker
            .ok_or_else(|| ScoringError::illegal("no batter at the striker's end"))?;
        let non_striker = self
            .non_striker
            .ok_or_else(|| ScoringError::illegal("no batter at the non-striker's end"))?;
        let bowler_id = self.current_bowler;
        let legal = ball.is_legal();
        // every other counter is a share of the total
        if self.total_runs.checked_add(ball.team_runs()).is_none() {
            return Err(ScoringError::InvalidBall("team total would overflow".to_string()));
        }

        match ball.extra {
            Some(ExtraType::Wide) => self.extras.wides += ball.team_runs(),
            Some(ExtraType::NoBall) => self.extras.no_balls += 1,
            Some(ExtraType::Bye) => self.extras.byes += ball.runs,
            Some(ExtraType::LegBye) => self.extras.leg_byes += ball.runs,
            None => {}
        }
        self.total_runs += ball.team_runs();

        let batter = self.batter_figures.entry(striker).or_default();
        batter.runs_scored += ball.batter_runs();
        if legal {
            batter.balls_faced += 1;
        }
        if matches!(ball.extra, None | Some(ExtraType::NoBall)) {
            match ball.runs {
                4 => batter.fours += 1,
                6 => batter.sixes += 1,
                _ => {}
            }
        }

        let bowler = self.bowler_figures.entry(bowler_id).or_default();
        bowler.runs_conceded += ball.bowler_runs();
        match ball.extra {
            Some(ExtraType::Wide) => bowler.wides += 1,
            Some(ExtraType::NoBall) => bowler.no_balls += 1,
            _ => {}
        }
        if legal {
            bowler.legal_balls_bowled += 1;
            self.balls_in_current_over += 1;
        }
        self.runs_in_current_over += ball.bowler_runs();

        let mut dismissed = None;
        if let Some(dismissal) = ball.wicket {
            let out = match dismissal.batter {
                BatterEnd::Striker => striker,
                BatterEnd::NonStriker => non_striker,
            };
            let figures = self.batter_figures.entry(out).or_default();
            figures.is_out = true;
            figures.out_method = Some(dismissal.method);
            if dismissal.method.credits_bowler() {
                figures.dismissed_by = Some(bowler_id);
                if let Some(bowler) = self.bowler_figures.get_mut(&bowler_id) {
                    bowler.wickets_taken += 1;
                }
            }
            self.wickets_lost += 1;
            self.fall_of_wickets.push(FallOfWicket {
                wicket: self.wickets_lost,
                player: out,
                team_runs: self.total_runs,
                legal_balls: self.legal_balls(),
            });
            match dismissal.batter {
                BatterEnd::Striker => self.striker = None,
                BatterEnd::NonStriker => self.non_striker = None,
            }
            dismissed = Some(out);
        }

        if ball.runs % 2 == 1 {
            self.swap_ends();
        }

        let mut over_completed = false;
        if self.balls_in_current_over == BALLS_PER_OVER {
            if self.runs_in_current_over == 0 {
                if let Some(bowler) = self.bowler_figures.get_mut(&bowler_id) {
                    bowler.maidens += 1;
                }
            }
            self.completed_overs += 1;
            self.balls_in_current_over = 0;
            self.runs_in_current_over = 0;
            self.swap_ends();
            over_completed = true;
        }

        let innings_end = self.check_termination();
        if let Some(reason) = innings_end {
            self.is_complete = true;
            self.end_reason = Some(reason);
        }

        Ok(BallReport {
            legal,
            runs_to_total: ball.team_runs(),
            wicket: dismissed,
            over_completed,
            innings_end,
        })
    }

    fn swap_ends(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    fn check_termination(&self) -> Option<InningsEnd> {
        if self.rules.target.is_some_and(|t| self.total_runs >= t) {
            Some(InningsEnd::TargetReached)
        } else if self.wickets_lost >= self.rules.max_wickets {
            Some(InningsEnd::AllOut)
        } else if self.completed_overs >= self.rules.match_overs {
            Some(InningsEnd::OversExhausted)
        } else {
            None
        }
    }

    /// Sends the next batter in to the vacated end.
    pub fn select_next_batter(&mut self, player: PlayerId, batting_roster: &Roster) -> Result<()> {
        if self.is_complete {
            return Err(ScoringError::illegal("innings is complete"));
        }
        if !batting_roster.contains(player) {
            return Err(ScoringError::InvalidSelection(format!(
                "{player} is not in the {} batting roster",
                self.rules.batting_side
            )));
        }
        if self.batter_figures.contains_key(&player) {
            return Err(ScoringError::DuplicateSelection(format!("{player} has already batted")));
        }
        let slot = if self.striker.is_none() {
            &mut self.striker
        } else if self.non_striker.is_none() {
            &mut self.non_striker
        } else {
            return Err(ScoringError::illegal("both ends are occupied"));
        };
        *slot = Some(player);
        self.batter_figures.insert(player, BatterFigures::default());
        self.batting_order.push(player);
        Ok(())
    }

    /// Batting-side players who can still come in.
    pub fn yet_to_bat(&self, batting_roster: &Roster) -> Vec<PlayerId> {
        batting_roster
            .players
            .iter()
            .map(|p| p.id)
            .filter(|id| !self.batter_figures.contains_key(id))
            .collect()
    }

    /// Closes a live innings without a natural end (match abandoned).
    pub(crate) fn close_abandoned(&mut self) {
        if !self.is_complete {
            self.is_complete = true;
            self.end_reason = Some(InningsEnd::Abandoned);
        }
    }

    pub fn score_line(&self) -> String {
        format!("{}/{}", self.total_runs, self.wickets_lost)
    }

    pub fn summarize(&self, setup: &MatchSetup) -> InningsSummary {
        let batting = self
            .batting_order
            .iter()
            .map(|&id| BattingLine {
                player: id,
                name: setup.player_name(id).to_string(),
                figures: self.batter_figures.get(&id).cloned().unwrap_or_default(),
            })
            .collect();
        let bowling = self
            .bowling_order
            .iter()
            .map(|&id| BowlingLine {
                player: id,
                name: setup.player_name(id).to_string(),
                figures: self.bowler_figures.get(&id).cloned().unwrap_or_default(),
            })
            .collect();

        InningsSummary {
            number: self.rules.number,
            batting_side: self.rules.batting_side,
            batting_team: setup.team_name(self.rules.batting_side).to_string(),
            bowling_team: setup.team_name(self.rules.bowling_side).to_string(),
            total_runs: self.total_runs,
            wickets_lost: self.wickets_lost,
            overs: self.overs(),
            extras: self.extras,
            batting,
            bowling,
            did_not_bat: self.yet_to_bat(setup.roster(self.rules.batting_side)),
            fall_of_wickets: self.fall_of_wickets.clone(),
            end_reason: self.end_reason,
        }
    }
}

impl InvariantCheck for InningsState {
    fn validate_invariants(&self) -> Result<()> {
        if self.wickets_lost > self.rules.max_wickets || self.wickets_lost > MAX_WICKETS {
            return Err(ScoringError::InvariantViolation("wickets lost exceeds the maximum"));
        }
        if self.completed_overs > self.rules.match_overs {
            return Err(ScoringError::InvariantViolation("completed overs exceeds match overs"));
        }
        if self.balls_in_current_over >= BALLS_PER_OVER {
            return Err(ScoringError::InvariantViolation("ball counter did not roll over"));
        }
        if self.completed_overs > 0 && self.previous_over_bowler == Some(self.current_bowler) {
            return Err(ScoringError::InvariantViolation("bowler bowling consecutive overs"));
        }
        if self.striker.is_some() && self.striker == self.non_striker {
            return Err(ScoringError::InvariantViolation("striker and non-striker are the same player"));
        }
        let out_at_crease = [self.striker, self.non_striker]
            .into_iter()
            .flatten()
            .any(|id| self.batter_figures.get(&id).is_some_and(|f| f.is_out));
        if out_at_crease {
            return Err(ScoringError::InvariantViolation("dismissed batter still at the crease"));
        }
        if self.total_runs != self.batter_runs_total() + self.extras.total() {
            return Err(ScoringError::InvariantViolation("total does not reconcile with batters and extras"));
        }
        Ok(())
    }
}
