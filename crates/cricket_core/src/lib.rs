//! # cricket_core - Live Cricket Match Scoring Engine
//!
//! Ball-by-ball scoring for limited-overs matches: roster and toss setup,
//! opening selection, ball outcomes, over rotation, the innings break and
//! the final result, with read-only snapshots for spectators.
//!
//! ## Features
//! - One controller owns the match; every change is a `ScoringCommand`
//! - Rejected commands leave the match untouched
//! - The command log replays to an identical match
//! - JSON API for hosts that keep their own log
//!
//! ```rust
//! use cricket_core::engine::{resolve_match_setup, MatchController, ScoringPhase};
//! use cricket_core::models::{
//!     BallOutcome, PlayerEntry, PlayerId, RosterInput, ScoringCommand, TeamSide, TossDecision,
//!     TossInput,
//! };
//! use cricket_core::ScoringConfig;
//! use rand::SeedableRng;
//!
//! let roster = RosterInput {
//!     my_team_name: "Lions".to_string(),
//!     opponent_team_name: "Tigers".to_string(),
//!     my_team_players: vec![PlayerEntry::from("Asha"), PlayerEntry::from("Ben")],
//!     opponent_team_players: vec![PlayerEntry::from("Cal"), PlayerEntry::from("Dev")],
//!     match_overs: 1,
//! };
//! let toss = TossInput::Manual { winner: TeamSide::Home, decision: TossDecision::Bat };
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
//! let setup = resolve_match_setup(uuid::Uuid::new_v4(), &roster, &toss, &mut rng)?;
//!
//! let mut controller = MatchController::new(setup, ScoringConfig::default())?;
//! controller.apply(ScoringCommand::SelectStriker { player: PlayerId(0) })?;
//! controller.apply(ScoringCommand::SelectNonStriker { player: PlayerId(1) })?;
//! controller.apply(ScoringCommand::SelectOpeningBowler { player: PlayerId(2) })?;
//! let phase = controller.apply(ScoringCommand::ball(BallOutcome::runs(4)))?;
//! assert_eq!(phase, ScoringPhase::AwaitingBall);
//! # Ok::<(), cricket_core::ScoringError>(())
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;

pub use api::{score_match, score_match_json, ApiError, ScoreRequest, ScoreResponse};
pub use config::{ManOfTheMatchWeights, RetryPolicy, ScoringConfig};
pub use engine::{
    replay, Access, MatchController, MatchSnapshot, ScoringPhase, ScoringSession, SnapshotBoard,
};
pub use error::{Result, ScoringError};
pub use models::{MatchResult, MatchSetup, MatchSummary, ScoringCommand};
pub use save::{FileSummarySink, PersistenceWorker, SaveError, SummarySink};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the JSON request/response schema
pub const SCHEMA_VERSION: u8 = 1;
