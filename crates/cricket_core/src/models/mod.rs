pub mod ball;
pub mod command;
pub mod figures;
pub mod match_result;
pub mod match_setup;
pub mod player;
pub mod team;

pub use ball::{BallOutcome, BatterEnd, Dismissal, ExtraType, WicketMethod};
pub use command::ScoringCommand;
pub use figures::{
    runs_per_over, BatterFigures, BowlerFigures, Extras, FallOfWicket, OverCount, BALLS_PER_OVER,
};
pub use match_result::{
    BattingLine, BowlingLine, InningsEnd, InningsSummary, Margin, MatchResult, MatchSummary,
    MotmCandidate,
};
pub use match_setup::{
    CoinFace, MatchSetup, RosterInput, TossDecision, TossInput, TossOutcome,
};
pub use player::{LinkedPlayer, Player, PlayerEntry, PlayerId};
pub use team::{Roster, TeamRole, TeamSide};
