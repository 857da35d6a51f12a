use serde::{Deserialize, Serialize};

use super::ball::BallOutcome;
use super::player::PlayerId;

/// One scorer action. The accepted sequence of commands is the match's
/// command log, from which the whole match can be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringCommand {
    SelectStriker { player: PlayerId },
    SelectNonStriker { player: PlayerId },
    SelectOpeningBowler { player: PlayerId },
    /// Step back one opening selection
    UndoSelection,
    RecordBall { ball: BallOutcome },
    SelectNextBatter { player: PlayerId },
    SelectNextBowler { player: PlayerId },
    StartNextInnings,
    Abandon { reason: String },
}

impl ScoringCommand {
    pub fn ball(ball: BallOutcome) -> Self {
        ScoringCommand::RecordBall { ball }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScoringCommand::SelectStriker { .. } => "select_striker",
            ScoringCommand::SelectNonStriker { .. } => "select_non_striker",
            ScoringCommand::SelectOpeningBowler { .. } => "select_opening_bowler",
            ScoringCommand::UndoSelection => "undo_selection",
            ScoringCommand::RecordBall { .. } => "record_ball",
            ScoringCommand::SelectNextBatter { .. } => "select_next_batter",
            ScoringCommand::SelectNextBowler { .. } => "select_next_bowler",
            ScoringCommand::StartNextInnings => "start_next_innings",
            ScoringCommand::Abandon { .. } => "abandon",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn test_command_wire_shape() {
        assert_json_snapshot!(ScoringCommand::SelectStriker { player: PlayerId(3) }, @r###"
        {
          "type": "select_striker",
          "player": 3
        }
        "###);
        assert_json_snapshot!(ScoringCommand::ball(BallOutcome::wide(1)), @r###"
        {
          "type": "record_ball",
          "ball": {
            "runs": 1,
            "extra": "wide"
          }
        }
        "###);
        assert_json_snapshot!(ScoringCommand::StartNextInnings, @r###"
        {
          "type": "start_next_innings"
        }
        "###);
    }

    #[test]
    fn test_command_parses_from_json() {
        let cmd: ScoringCommand =
            serde_json::from_str(r#"{"type": "record_ball", "ball": {"runs": 4}}"#).unwrap();
        assert_eq!(cmd, ScoringCommand::ball(BallOutcome::runs(4)));
        assert_eq!(cmd.name(), "record_ball");
    }
}
