//! Match Result Data Structures
//!
//! Terminal output of the scoring engine. A `MatchSummary` is built once,
//! when the second innings closes (or the match is abandoned), and is never
//! mutated afterwards. It is the record handed to the persistence
//! collaborator for career-stat aggregation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::command::ScoringCommand;
use super::figures::{BatterFigures, BowlerFigures, Extras, FallOfWicket, OverCount};
use super::match_setup::MatchSetup;
use super::player::PlayerId;
use super::team::TeamSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
}

impl Margin {
    pub fn describe(&self) -> String {
        match self {
            Margin::Runs(1) => "1 run".to_string(),
            Margin::Runs(n) => format!("{n} runs"),
            Margin::Wickets(1) => "1 wicket".to_string(),
            Margin::Wickets(n) => format!("{n} wickets"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    FirstSideWins { margin: Margin },
    SecondSideWins { margin: Margin },
    /// Scores level after both innings
    Draw,
    /// Match abandoned before a result
    NoResult { reason: String },
}

impl MatchResult {
    pub fn margin(&self) -> Option<Margin> {
        match self {
            MatchResult::FirstSideWins { margin } | MatchResult::SecondSideWins { margin } => {
                Some(*margin)
            }
            MatchResult::Draw | MatchResult::NoResult { .. } => None,
        }
    }

    pub fn winner(&self, first_batting: TeamSide) -> Option<TeamSide> {
        match self {
            MatchResult::FirstSideWins { .. } => Some(first_batting),
            MatchResult::SecondSideWins { .. } => Some(first_batting.opponent()),
            MatchResult::Draw | MatchResult::NoResult { .. } => None,
        }
    }

    /// Human-readable result line ("Lions won by 4 wickets").
    pub fn describe(&self, setup: &MatchSetup) -> String {
        match self {
            MatchResult::Draw => "Match tied".to_string(),
            MatchResult::NoResult { reason } if reason.is_empty() => "No result".to_string(),
            MatchResult::NoResult { reason } => format!("No result ({reason})"),
            MatchResult::FirstSideWins { margin } | MatchResult::SecondSideWins { margin } => {
                let winner = self.winner(setup.first_batting).unwrap_or(setup.first_batting);
                format!("{} won by {}", setup.team_name(winner), margin.describe())
            }
        }
    }
}

/// Why an innings closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsEnd {
    AllOut,
    OversExhausted,
    TargetReached,
    /// Match abandoned while the innings was live
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingLine {
    pub player: PlayerId,
    pub name: String,
    pub figures: BatterFigures,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingLine {
    pub player: PlayerId,
    pub name: String,
    pub figures: BowlerFigures,
}

/// Scorecard for one completed (or abandoned) innings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsSummary {
    pub number: u8,
    pub batting_side: TeamSide,
    pub batting_team: String,
    pub bowling_team: String,
    pub total_runs: u32,
    pub wickets_lost: u32,
    pub overs: OverCount,
    pub extras: Extras,
    /// In order of appearance
    pub batting: Vec<BattingLine>,
    /// In order of first over bowled
    pub bowling: Vec<BowlingLine>,
    pub did_not_bat: Vec<PlayerId>,
    pub fall_of_wickets: Vec<FallOfWicket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<InningsEnd>,
}

impl InningsSummary {
    pub fn score_line(&self) -> String {
        format!("{}/{}", self.total_runs, self.wickets_lost)
    }
}

/// Man-of-the-match candidate with the inputs of the impact score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotmCandidate {
    pub player: PlayerId,
    pub name: String,
    pub side: TeamSide,
    pub runs: u32,
    pub wickets: u32,
    pub maidens: u32,
    pub impact: u32,
}

/// Immutable end-of-match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: Uuid,
    pub setup: MatchSetup,
    pub innings: Vec<InningsSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    pub result: MatchResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<TeamSide>,
    pub result_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub man_of_the_match: Option<PlayerId>,
    /// Sorted by impact, best first
    pub candidates: Vec<MotmCandidate>,
    /// Accepted command log; replaying it reproduces this summary
    pub commands: Vec<ScoringCommand>,
}

impl MatchSummary {
    pub fn innings(&self, number: u8) -> Option<&InningsSummary> {
        self.innings.iter().find(|i| i.number == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn test_margin_text() {
        assert_eq!(Margin::Runs(1).describe(), "1 run");
        assert_eq!(Margin::Runs(12).describe(), "12 runs");
        assert_eq!(Margin::Wickets(4).describe(), "4 wickets");
    }

    #[test]
    fn test_winner() {
        let result = MatchResult::SecondSideWins { margin: Margin::Wickets(4) };
        assert_eq!(result.winner(TeamSide::Home), Some(TeamSide::Away));
        assert_eq!(result.margin(), Some(Margin::Wickets(4)));
        assert_eq!(MatchResult::Draw.winner(TeamSide::Home), None);
    }

    #[test]
    fn test_result_wire_shape() {
        assert_json_snapshot!(MatchResult::SecondSideWins { margin: Margin::Wickets(4) }, @r###"
        {
          "outcome": "second_side_wins",
          "margin": {
            "kind": "wickets",
            "value": 4
          }
        }
        "###);
        assert_json_snapshot!(MatchResult::Draw, @r###"
        {
          "outcome": "draw"
        }
        "###);
    }
}
