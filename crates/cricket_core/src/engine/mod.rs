pub mod controller;
pub mod innings; // Ball outcome processor
pub mod opening; // Opening selection with undo
pub mod result; // Result evaluator + man of the match
pub mod rotation; // Over/bowler rotation
pub mod session; // Scorer/spectator wrapper around the controller
pub mod snapshot;
pub mod toss; // Roster & toss resolver
pub mod transition; // Innings break


pub use controller::{replay, MatchController, MatchState, ScoringPhase};
pub use innings::{BallReport, InningsRules, InningsState, OpeningLineup};
pub use opening::{OpeningSelection, OpeningStep};
pub use result::{build_summary, evaluate_result, rank_candidates};
pub use rotation::{apply_next_bowler, eligible_bowlers};
pub use session::{Access, ScoringSession};
pub use snapshot::{status_line, InningsScore, MatchSnapshot, Scoreboard, SnapshotBoard};
pub use toss::{build_roster, draw_coin, resolve_match_setup, resolve_toss};
pub use transition::{begin_second_innings, innings_rules, target_for};
