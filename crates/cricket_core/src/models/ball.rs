use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraType {
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl ExtraType {
    /// Wides and no-balls must be re-bowled.
    #[inline]
    pub fn is_legal(self) -> bool {
        matches!(self, ExtraType::Bye | ExtraType::LegBye)
    }

    pub fn label(self) -> &'static str {
        match self {
            ExtraType::Wide => "wide",
            ExtraType::NoBall => "no-ball",
            ExtraType::Bye => "bye",
            ExtraType::LegBye => "leg-bye",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WicketMethod {
    Bowled,
    Caught,
    Lbw,
    Stumped,
    HitWicket,
    RunOut,
}

impl WicketMethod {
    /// Whether the bowler is credited with the wicket.
    #[inline]
    pub fn credits_bowler(self) -> bool {
        !matches!(self, WicketMethod::RunOut)
    }

    pub fn label(self) -> &'static str {
        match self {
            WicketMethod::Bowled => "bowled",
            WicketMethod::Caught => "caught",
            WicketMethod::Lbw => "lbw",
            WicketMethod::Stumped => "stumped",
            WicketMethod::HitWicket => "hit wicket",
            WicketMethod::RunOut => "run out",
        }
    }
}

/// Which batter a dismissal applies to, judged before the batters cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatterEnd {
    #[default]
    Striker,
    NonStriker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub method: WicketMethod,
    #[serde(default)]
    pub batter: BatterEnd,
}

/// One delivery as entered by the scorer.
///
/// `runs` is the runs completed on the ball: runs off the bat for a fair
/// delivery or a no-ball, the bye/leg-bye count for byes, and runs run on a
/// wide (on top of the one-run wide penalty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BallOutcome {
    #[serde(default)]
    pub runs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wicket: Option<Dismissal>,
}

impl BallOutcome {
    pub fn dot() -> Self {
        Self::default()
    }

    pub fn runs(runs: u32) -> Self {
        Self { runs, ..Self::default() }
    }

    pub fn wide(runs_run: u32) -> Self {
        Self { runs: runs_run, extra: Some(ExtraType::Wide), wicket: None }
    }

    pub fn no_ball(runs_off_bat: u32) -> Self {
        Self { runs: runs_off_bat, extra: Some(ExtraType::NoBall), wicket: None }
    }

    pub fn byes(runs: u32) -> Self {
        Self { runs, extra: Some(ExtraType::Bye), wicket: None }
    }

    pub fn leg_byes(runs: u32) -> Self {
        Self { runs, extra: Some(ExtraType::LegBye), wicket: None }
    }

    pub fn wicket(method: WicketMethod) -> Self {
        Self { wicket: Some(Dismissal { method, batter: BatterEnd::Striker }), ..Self::default() }
    }

    pub fn run_out(runs_completed: u32, batter: BatterEnd) -> Self {
        Self {
            runs: runs_completed,
            extra: None,
            wicket: Some(Dismissal { method: WicketMethod::RunOut, batter }),
        }
    }

    pub fn with_wicket(mut self, dismissal: Dismissal) -> Self {
        self.wicket = Some(dismissal);
        self
    }

    /// Counts toward the six balls of an over.
    #[inline]
    pub fn is_legal(&self) -> bool {
        self.extra.map_or(true, ExtraType::is_legal)
    }

    /// Runs credited to the striker.
    #[inline]
    pub fn batter_runs(&self) -> u32 {
        match self.extra {
            None | Some(ExtraType::NoBall) => self.runs,
            _ => 0,
        }
    }

    /// Runs added to the team total, including the wide/no-ball penalty.
    #[inline]
    pub fn team_runs(&self) -> u32 {
        self.checked_team_runs().unwrap_or(u32::MAX)
    }

    /// `None` when the penalty run would overflow.
    pub fn checked_team_runs(&self) -> Option<u32> {
        match self.extra {
            Some(ExtraType::Wide) | Some(ExtraType::NoBall) => self.runs.checked_add(1),
            _ => Some(self.runs),
        }
    }

    /// Runs charged against the bowler. Byes and leg-byes are not.
    #[inline]
    pub fn bowler_runs(&self) -> u32 {
        match self.extra {
            Some(ExtraType::Bye) | Some(ExtraType::LegBye) => 0,
            _ => self.team_runs(),
        }
    }

    /// Checks the combination is possible under the laws.
    pub fn validate(&self, max_runs: u32) -> Result<()> {
        if self.runs > max_runs {
            return Err(ScoringError::InvalidBall(format!(
                "{} runs on one ball exceeds the limit of {}",
                self.runs, max_runs
            )));
        }
        if self.checked_team_runs().is_none() {
            return Err(ScoringError::InvalidBall(format!("{} runs cannot be scored", self.runs)));
        }

        let Some(dismissal) = self.wicket else {
            return Ok(());
        };

        if dismissal.batter == BatterEnd::NonStriker && dismissal.method != WicketMethod::RunOut {
            return Err(ScoringError::InvalidBall(format!(
                "non-striker cannot be dismissed {}",
                dismissal.method.label()
            )));
        }

        let allowed = match self.extra {
            None | Some(ExtraType::Bye) | Some(ExtraType::LegBye) => true,
            Some(ExtraType::Wide) => matches!(
                dismissal.method,
                WicketMethod::Stumped | WicketMethod::HitWicket | WicketMethod::RunOut
            ),
            Some(ExtraType::NoBall) => dismissal.method == WicketMethod::RunOut,
        };

        if !allowed {
            return Err(ScoringError::InvalidBall(format!(
                "cannot be dismissed {} off a {}",
                dismissal.method.label(),
                self.extra.map_or("fair delivery", ExtraType::label)
            )));
        }

        // Only a run-out leaves completed runs standing.
        if self.runs > 0 && dismissal.method != WicketMethod::RunOut {
            return Err(ScoringError::InvalidBall(format!(
                "no runs can be completed when {}",
                dismissal.method.label()
            )));
        }

        Ok(())
    }
}
