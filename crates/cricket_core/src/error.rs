use thiserror::Error;

use crate::models::TeamSide;

/// Validation failures raised by the scoring engine.
///
/// On any of these the controller state is left exactly as it was before the
/// rejected command. All but `InvariantViolation` are recoverable by
/// re-prompting the scorer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid match overs: {0} (must be at least 1)")]
    InvalidMatchOvers(u32),

    #[error("Insufficient players on {side} side: need {needed}, have {available}")]
    InsufficientPlayers { side: TeamSide, needed: usize, available: usize },

    #[error("Duplicate selection: {0}")]
    DuplicateSelection(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("No eligible bowler for the next over")]
    NoEligibleBowler,

    #[error("Illegal state transition: {0}")]
    IllegalStateTransition(String),

    #[error("Invalid ball: {0}")]
    InvalidBall(String),

    #[error("Caller is not authorized to score this match")]
    Unauthorized,

    #[error("Invariant violated: {0}")]
    InvariantViolation(&'static str),
}

impl ScoringError {
    /// Whether re-prompting the scorer can resolve the failure.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ScoringError::InvariantViolation(_))
    }

    pub(crate) fn illegal(msg: impl Into<String>) -> Self {
        ScoringError::IllegalStateTransition(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;

/// Implemented by live state that must hold its invariants between commands.
pub trait InvariantCheck {
    fn validate_invariants(&self) -> Result<()>;
}
