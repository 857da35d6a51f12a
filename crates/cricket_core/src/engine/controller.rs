//! Match Controller
//!
//! Single owner of `MatchState`. All mutation goes through
//! [`MatchController::apply`]; accepted commands are appended to the
//! command log, so [`replay`] over the log rebuilds an identical match.
//!
//! ```text
//! AwaitingOpening ──bowler──▶ AwaitingBall ──ball──▶ AwaitingBall
//!        ▲                       │   ▲  ▲
//!        │                wicket │   │  └── SelectNextBowler ◀── AwaitingBowler ◀─ over done
//!        │                       ▼   │
//!        │                 AwaitingBatter
//!        │
//!   StartNextInnings ◀── InningsBreak ◀── innings 1 closed
//!                                            innings 2 closed ──▶ MatchComplete
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::error::{InvariantCheck, Result, ScoringError};
use crate::models::{BallOutcome, MatchResult, MatchSetup, MatchSummary, PlayerId, ScoringCommand};

use super::innings::{BallReport, InningsState};
use super::opening::{OpeningSelection, OpeningStep};
use super::result::{build_summary, evaluate_result};
use super::rotation::{apply_next_bowler, eligible_bowlers};
use super::transition::{begin_second_innings, innings_rules, target_for};

// ============================================
// Phase
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ScoringPhase {
    /// Openers and opening bowler being picked
    AwaitingOpening,
    AwaitingBall,
    /// A wicket left an end empty; `then_bowler` when the over also ended
    AwaitingBatter { then_bowler: bool },
    AwaitingBowler,
    InningsBreak,
    MatchComplete,
    Abandoned,
}

impl ScoringPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScoringPhase::MatchComplete | ScoringPhase::Abandoned)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoringPhase::AwaitingOpening => "awaiting opening selection",
            ScoringPhase::AwaitingBall => "awaiting ball",
            ScoringPhase::AwaitingBatter { .. } => "awaiting next batter",
            ScoringPhase::AwaitingBowler => "awaiting next bowler",
            ScoringPhase::InningsBreak => "innings break",
            ScoringPhase::MatchComplete => "match complete",
            ScoringPhase::Abandoned => "match abandoned",
        }
    }
}

// ============================================
// MatchState
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub match_overs: u32,
    /// Empty until the first opening selection completes
    pub innings: Vec<InningsState>,
    /// 1 or 2
    pub current_innings_index: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
}

impl MatchState {
    fn new(match_overs: u32) -> Self {
        Self {
            match_overs,
            innings: Vec::new(),
            current_innings_index: 1,
            target: None,
            result: None,
        }
    }

    /// Innings `current_innings_index`, once it has started.
    pub fn current_innings(&self) -> Option<&InningsState> {
        self.innings.get(usize::from(self.current_innings_index).saturating_sub(1))
    }

    fn current_innings_mut(&mut self) -> Result<&mut InningsState> {
        let index = usize::from(self.current_innings_index).saturating_sub(1);
        self.innings
            .get_mut(index)
            .ok_or_else(|| ScoringError::illegal("no innings in progress"))
    }

    pub fn first_innings(&self) -> Option<&InningsState> {
        self.innings.first()
    }
}

impl InvariantCheck for MatchState {
    fn validate_invariants(&self) -> Result<()> {
        if self.innings.len() > 2 {
            return Err(ScoringError::InvariantViolation("more than two innings"));
        }
        if !(1..=2).contains(&self.current_innings_index) {
            return Err(ScoringError::InvariantViolation("innings index out of range"));
        }
        if self.innings.len() == 2 && self.target.is_none() {
            return Err(ScoringError::InvariantViolation("second innings without a target"));
        }
        for inn in &self.innings {
            inn.validate_invariants()?;
        }
        Ok(())
    }
}

// ============================================
// MatchController
// ============================================

#[derive(Debug, Clone)]
pub struct MatchController {
    setup: MatchSetup,
    config: ScoringConfig,
    state: MatchState,
    phase: ScoringPhase,
    opening: Option<OpeningSelection>,
    commands: Vec<ScoringCommand>,
    last_ball: Option<BallReport>,
    summary: Option<MatchSummary>,
}

impl MatchController {
    pub fn new(setup: MatchSetup, config: ScoringConfig) -> Result<Self> {
        let opening = OpeningSelection::new(&setup, 1)?;
        let state = MatchState::new(setup.match_overs);
        log::info!(
            "Match {} created: {} v {}, {} overs",
            setup.match_id,
            setup.home.team_name,
            setup.away.team_name,
            setup.match_overs
        );
        Ok(Self {
            setup,
            config,
            state,
            phase: ScoringPhase::AwaitingOpening,
            opening: Some(opening),
            commands: Vec::new(),
            last_ball: None,
            summary: None,
        })
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> ScoringPhase {
        self.phase
    }

    pub fn opening(&self) -> Option<&OpeningSelection> {
        self.opening.as_ref()
    }

    pub fn commands(&self) -> &[ScoringCommand] {
        &self.commands
    }

    pub fn last_ball(&self) -> Option<&BallReport> {
        self.last_ball.as_ref()
    }

    /// Set once the match is complete or abandoned.
    pub fn summary(&self) -> Option<&MatchSummary> {
        self.summary.as_ref()
    }

    pub fn current_innings(&self) -> Option<&InningsState> {
        self.state.current_innings()
    }

    /// Bowlers the scorer may pick right now.
    pub fn eligible_bowlers(&self) -> Vec<PlayerId> {
        match (&self.phase, &self.opening, self.state.current_innings()) {
            (ScoringPhase::AwaitingOpening, Some(opening), _)
                if opening.step() == OpeningStep::Bowler =>
            {
                opening.candidates()
            }
            (ScoringPhase::AwaitingBowler, _, Some(inn)) => {
                eligible_bowlers(inn, self.setup.roster(inn.bowling_side()))
            }
            _ => Vec::new(),
        }
    }

    /// Batters who can still come in during the current innings.
    pub fn available_batters(&self) -> Vec<PlayerId> {
        match (&self.phase, self.state.current_innings()) {
            (ScoringPhase::AwaitingBatter { .. }, Some(inn)) => {
                inn.yet_to_bat(self.setup.roster(inn.batting_side()))
            }
            _ => Vec::new(),
        }
    }

    /// Applies one scorer command. On error nothing changes.
    pub fn apply(&mut self, command: ScoringCommand) -> Result<ScoringPhase> {
        if self.phase.is_terminal() {
            return Err(ScoringError::illegal(format!(
                "cannot {} after the {}",
                command.name(),
                self.phase.label()
            )));
        }

        match &command {
            ScoringCommand::SelectStriker { player } => self.select_striker(*player)?,
            ScoringCommand::SelectNonStriker { player } => self.select_non_striker(*player)?,
            ScoringCommand::SelectOpeningBowler { player } => self.select_opening_bowler(*player)?,
            ScoringCommand::UndoSelection => self.undo_selection()?,
            ScoringCommand::RecordBall { ball } => self.record_ball(ball)?,
            ScoringCommand::SelectNextBatter { player } => self.select_next_batter(*player)?,
            ScoringCommand::SelectNextBowler { player } => self.select_next_bowler(*player)?,
            ScoringCommand::StartNextInnings => self.start_next_innings()?,
            ScoringCommand::Abandon { reason } => self.abandon(reason),
        }

        self.commands.push(command);
        if self.phase.is_terminal() {
            self.finish();
        }
        Ok(self.phase)
    }

    fn wrong_phase(&self, action: &str) -> ScoringError {
        ScoringError::illegal(format!("cannot {action} while {}", self.phase.label()))
    }

    fn opening_mut(&mut self, action: &str) -> Result<&mut OpeningSelection> {
        if self.phase != ScoringPhase::AwaitingOpening {
            return Err(self.wrong_phase(action));
        }
        self.opening
            .as_mut()
            .ok_or_else(|| ScoringError::illegal("no opening selection in progress"))
    }

    fn select_striker(&mut self, player: PlayerId) -> Result<()> {
        self.opening_mut("select the striker")?.select_striker(player)
    }

    fn select_non_striker(&mut self, player: PlayerId) -> Result<()> {
        self.opening_mut("select the non-striker")?.select_non_striker(player)
    }

    fn undo_selection(&mut self) -> Result<()> {
        self.opening_mut("undo a selection")?.back()
    }

    fn select_opening_bowler(&mut self, player: PlayerId) -> Result<()> {
        let opening = self.opening_mut("select the opening bowler")?;
        let mut pending = opening.clone();
        pending.select_bowler(player)?;
        let lineup = pending.lineup()?;

        let number = pending.innings_number;
        let rules = innings_rules(&self.setup, number, &self.config, self.state.target);
        self.state.innings.push(InningsState::open(rules, lineup));
        self.state.current_innings_index = number;
        self.opening = None;
        self.phase = ScoringPhase::AwaitingBall;
        log::info!(
            "Innings {} under way: {} and {} to face {}",
            number,
            self.setup.player_name(lineup.striker),
            self.setup.player_name(lineup.non_striker),
            self.setup.player_name(lineup.bowler)
        );
        Ok(())
    }

    fn record_ball(&mut self, ball: &BallOutcome) -> Result<()> {
        if self.phase != ScoringPhase::AwaitingBall {
            return Err(self.wrong_phase("record a ball"));
        }
        let max_runs = self.config.max_runs_per_ball;
        let innings = self.state.current_innings_mut()?;
        let report = innings.apply_ball(ball, max_runs)?;
        let needs_batter = innings.needs_batter();
        self.last_ball = Some(report);

        self.phase = if report.innings_end.is_some() {
            self.close_innings()
        } else if needs_batter {
            ScoringPhase::AwaitingBatter { then_bowler: report.over_completed }
        } else if report.over_completed {
            ScoringPhase::AwaitingBowler
        } else {
            ScoringPhase::AwaitingBall
        };
        Ok(())
    }

    /// Phase after the current innings reached a natural end.
    fn close_innings(&mut self) -> ScoringPhase {
        let Some(inn) = self.state.current_innings() else {
            return self.phase;
        };
        if inn.number() == 1 {
            self.state.target = Some(target_for(inn));
            return ScoringPhase::InningsBreak;
        }
        match evaluate_result(inn) {
            Ok(result) => {
                self.state.result = Some(result);
                ScoringPhase::MatchComplete
            }
            Err(e) => {
                log::warn!("Could not evaluate result: {e}");
                self.phase
            }
        }
    }

    fn select_next_batter(&mut self, player: PlayerId) -> Result<()> {
        let ScoringPhase::AwaitingBatter { then_bowler } = self.phase else {
            return Err(self.wrong_phase("select the next batter"));
        };
        let setup = &self.setup;
        let innings = self.state.current_innings_mut()?;
        let roster = setup.roster(innings.batting_side());
        innings.select_next_batter(player, roster)?;
        self.phase = if then_bowler {
            ScoringPhase::AwaitingBowler
        } else {
            ScoringPhase::AwaitingBall
        };
        Ok(())
    }

    fn select_next_bowler(&mut self, player: PlayerId) -> Result<()> {
        if self.phase != ScoringPhase::AwaitingBowler {
            return Err(self.wrong_phase("select the next bowler"));
        }
        let setup = &self.setup;
        let innings = self.state.current_innings_mut()?;
        let roster = setup.roster(innings.bowling_side());
        apply_next_bowler(innings, player, roster)?;
        self.phase = ScoringPhase::AwaitingBall;
        Ok(())
    }

    fn start_next_innings(&mut self) -> Result<()> {
        if self.phase != ScoringPhase::InningsBreak {
            return Err(self.wrong_phase("start the next innings"));
        }
        let first = self
            .state
            .first_innings()
            .ok_or_else(|| ScoringError::illegal("first innings missing"))?;
        let (target, selection) = begin_second_innings(&self.setup, first)?;
        self.state.target = Some(target);
        self.opening = Some(selection);
        self.phase = ScoringPhase::AwaitingOpening;
        Ok(())
    }

    fn abandon(&mut self, reason: &str) {
        if let Ok(innings) = self.state.current_innings_mut() {
            innings.close_abandoned();
        }
        self.opening = None;
        self.state.result = Some(MatchResult::NoResult { reason: reason.trim().to_string() });
        self.phase = ScoringPhase::Abandoned;
        log::info!("Match {} abandoned: {}", self.setup.match_id, reason);
    }

    fn finish(&mut self) {
        let Some(result) = self.state.result.clone() else {
            return;
        };
        self.summary = Some(build_summary(
            &self.setup,
            &self.state.innings,
            self.state.target,
            result,
            &self.config,
            self.commands.clone(),
        ));
    }
}

/// Rebuilds a match by applying `commands` in order to a fresh controller.
pub fn replay(
    setup: MatchSetup,
    config: ScoringConfig,
    commands: &[ScoringCommand],
) -> Result<MatchController> {
    let mut controller = MatchController::new(setup, config)?;
    for (index, command) in commands.iter().enumerate() {
        if let Err(e) = controller.apply(command.clone()) {
            log::warn!("Replay stopped at command {} ({}): {}", index, command.name(), e);
            return Err(e);
        }
    }
    Ok(controller)
}
