//! Spectator Snapshots
//!
//! Read-only view of a match, captured between commands and published to a
//! `SnapshotBoard`. Spectators poll [`SnapshotBoard::latest`], which only
//! clones an `Arc`; the scorer publishes by swapping the pointer, so readers
//! never see a half-applied ball.
//!
//! # Example
//! ```ignore
//! let board = Arc::new(SnapshotBoard::new(MatchSnapshot::capture(&controller)));
//! controller.apply(command)?;
//! board.publish(MatchSnapshot::capture(&controller));
//! let view = board.latest();
//! ```

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::models::{
    runs_per_over, BattingLine, BowlingLine, Extras, MatchResult, OverCount, PlayerId,
};

use super::controller::{MatchController, ScoringPhase};
use super::innings::InningsState;
use super::opening::OpeningStep;

/// Live scoreboard of the innings in progress (or the last one played).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub innings_number: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: OverCount,
    pub match_overs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub striker: Option<BattingLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_striker: Option<BattingLine>,
    pub bowler: BowlingLine,
    pub extras: Extras,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs_required: Option<u32>,
    pub balls_remaining: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_run_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_run_rate: Option<f64>,
}

impl Scoreboard {
    fn from_innings(controller: &MatchController, inn: &InningsState) -> Self {
        let setup = controller.setup();
        let batter = |id: Option<PlayerId>| {
            id.map(|id| BattingLine {
                player: id,
                name: setup.player_name(id).to_string(),
                figures: inn.batter_figures.get(&id).cloned().unwrap_or_default(),
            })
        };
        let runs_required = if inn.is_complete { None } else { inn.runs_required() };

        Self {
            innings_number: inn.number(),
            batting_team: setup.team_name(inn.batting_side()).to_string(),
            bowling_team: setup.team_name(inn.bowling_side()).to_string(),
            runs: inn.total_runs,
            wickets: inn.wickets_lost,
            overs: inn.overs(),
            match_overs: inn.rules.match_overs,
            striker: batter(inn.striker),
            non_striker: batter(inn.non_striker),
            bowler: BowlingLine {
                player: inn.current_bowler,
                name: setup.player_name(inn.current_bowler).to_string(),
                figures: inn.bowler_figures.get(&inn.current_bowler).cloned().unwrap_or_default(),
            },
            extras: inn.extras,
            target: inn.rules.target,
            runs_required,
            balls_remaining: inn.balls_remaining(),
            current_run_rate: runs_per_over(inn.total_runs, inn.legal_balls()),
            required_run_rate: runs_required
                .and_then(|runs| runs_per_over(runs, inn.balls_remaining())),
        }
    }
}

/// Completed first innings, shown during the chase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsScore {
    pub batting_team: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: OverCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: Uuid,
    /// Accepted commands so far; strictly increases between publishes
    pub sequence: u64,
    pub phase: ScoringPhase,
    pub home_team: String,
    pub away_team: String,
    pub match_overs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoreboard: Option<Scoreboard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_innings: Option<InningsScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
    pub status: String,
}

impl MatchSnapshot {
    /// Read-only capture. Pure: two captures with no command in between are equal.
    pub fn capture(controller: &MatchController) -> Self {
        let setup = controller.setup();
        let state = controller.state();
        let scoreboard = state.current_innings().map(|inn| Scoreboard::from_innings(controller, inn));
        let first_innings = state
            .first_innings()
            .filter(|inn| inn.is_complete)
            .map(|inn| InningsScore {
                batting_team: setup.team_name(inn.batting_side()).to_string(),
                runs: inn.total_runs,
                wickets: inn.wickets_lost,
                overs: inn.overs(),
            });

        Self {
            match_id: setup.match_id,
            sequence: controller.commands().len() as u64,
            phase: controller.phase(),
            home_team: setup.home.team_name.clone(),
            away_team: setup.away.team_name.clone(),
            match_overs: setup.match_overs,
            scoreboard,
            first_innings,
            target: state.target,
            result: state.result.clone(),
            status: status_line(controller),
        }
    }
}

/// Human-readable one-liner for the spectator view.
pub fn status_line(controller: &MatchController) -> String {
    let setup = controller.setup();
    let state = controller.state();

    if let Some(summary) = controller.summary() {
        return summary.result_text.clone();
    }

    match controller.phase() {
        ScoringPhase::AwaitingOpening => {
            let Some(opening) = controller.opening() else {
                return "Awaiting opening selection".to_string();
            };
            let team = setup.team_name(opening.batting_side);
            let step = match opening.step() {
                OpeningStep::Striker => "select the opening striker",
                OpeningStep::NonStriker => "select the opening non-striker",
                OpeningStep::Bowler | OpeningStep::Ready => "select the opening bowler",
            };
            match state.target {
                Some(target) => format!("{team} need {target} to win: {step}"),
                None => format!("{team} to bat: {step}"),
            }
        }
        ScoringPhase::InningsBreak => match (state.first_innings(), state.target) {
            (Some(first), Some(target)) => format!(
                "Innings break: {} {} ({} ov), target {}",
                setup.team_name(first.batting_side()),
                first.score_line(),
                first.overs(),
                target
            ),
            _ => "Innings break".to_string(),
        },
        phase => {
            let Some(inn) = state.current_innings() else {
                return phase.label().to_string();
            };
            let team = setup.team_name(inn.batting_side());
            let score = format!("{team} {} ({} ov)", inn.score_line(), inn.overs());
            match (phase, inn.runs_required()) {
                (ScoringPhase::AwaitingBatter { .. }, _) => format!("Wicket! {score}, new batter in"),
                (_, Some(required)) => format!(
                    "{score}: need {} from {} balls",
                    required,
                    inn.balls_remaining()
                ),
                (ScoringPhase::AwaitingBowler, None) => {
                    format!("End of over {}: {score}", inn.completed_overs)
                }
                _ => score,
            }
        }
    }
}

/// Latest published snapshot, shared between the scorer and any number of
/// spectators.
#[derive(Debug)]
pub struct SnapshotBoard {
    latest: RwLock<Arc<MatchSnapshot>>,
}

impl SnapshotBoard {
    pub fn new(initial: MatchSnapshot) -> Self {
        Self { latest: RwLock::new(Arc::new(initial)) }
    }

    /// Replaces the visible snapshot. The write lock covers only the swap.
    pub fn publish(&self, snapshot: MatchSnapshot) {
        let next = Arc::new(snapshot);
        let mut guard = self.latest.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
    }

    pub fn latest(&self) -> Arc<MatchSnapshot> {
        let guard = self.latest.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn sequence(&self) -> u64 {
        self.latest().sequence
    }
}
