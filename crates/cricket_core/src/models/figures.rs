//! Per-innings batting, bowling and extras aggregates.
//!
//! Overs are always derived from integer legal-ball counts, never stored as
//! floats: 17.4 overs is `OverCount { overs: 17, balls: 4 }`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ball::WicketMethod;
use super::player::PlayerId;

/// Legal deliveries in an over.
pub const BALLS_PER_OVER: u32 = 6;

/// Display form of a legal-ball count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct OverCount {
    pub overs: u32,
    pub balls: u32,
}

impl OverCount {
    pub const fn from_balls(legal_balls: u32) -> Self {
        Self { overs: legal_balls / BALLS_PER_OVER, balls: legal_balls % BALLS_PER_OVER }
    }

    pub const fn total_balls(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls
    }
}

impl fmt::Display for OverCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.overs, self.balls)
    }
}

/// Runs per over given a legal-ball count. `None` before the first legal ball.
pub fn runs_per_over(runs: u32, legal_balls: u32) -> Option<f64> {
    if legal_balls == 0 {
        return None;
    }
    Some(runs as f64 * BALLS_PER_OVER as f64 / legal_balls as f64)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BatterFigures {
    pub runs_scored: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub is_out: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_method: Option<WicketMethod>,
    /// Bowler credited with the dismissal (none for run-outs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissed_by: Option<PlayerId>,
}

impl BatterFigures {
    /// Runs per 100 balls faced.
    pub fn strike_rate(&self) -> Option<f64> {
        if self.balls_faced == 0 {
            return None;
        }
        Some(self.runs_scored as f64 * 100.0 / self.balls_faced as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BowlerFigures {
    pub legal_balls_bowled: u32,
    pub runs_conceded: u32,
    pub wickets_taken: u32,
    pub maidens: u32,
    pub wides: u32,
    pub no_balls: u32,
}

impl BowlerFigures {
    pub fn overs(&self) -> OverCount {
        OverCount::from_balls(self.legal_balls_bowled)
    }

    pub fn economy(&self) -> Option<f64> {
        runs_per_over(self.runs_conceded, self.legal_balls_bowled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Extras {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

/// Score at which a wicket fell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallOfWicket {
    /// 1-based wicket number
    pub wicket: u32,
    pub player: PlayerId,
    pub team_runs: u32,
    /// Legal balls bowled in the innings when the wicket fell
    pub legal_balls: u32,
}

impl FallOfWicket {
    pub fn at_over(&self) -> OverCount {
        OverCount::from_balls(self.legal_balls)
    }
}
