//! Match Setup
//!
//! Everything fixed before the first ball: both rosters with their stable
//! player ids, the match length and the toss. Read-only once scoring starts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::player::{Player, PlayerEntry, PlayerId};
use super::team::{Roster, TeamRole, TeamSide};

/// Roster capture from the match-setup screen.
///
/// "My team" is always the `Home` side, the opponent `Away`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterInput {
    pub my_team_name: String,
    pub opponent_team_name: String,
    pub my_team_players: Vec<PlayerEntry>,
    pub opponent_team_players: Vec<PlayerEntry>,
    pub match_overs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinFace {
    Heads,
    Tails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

/// How the toss was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum TossInput {
    /// Toss done off-app; the scorer declares winner and decision.
    Manual { winner: TeamSide, decision: TossDecision },
    /// One side calls; the coin is drawn by the engine unless `result` is given.
    Random {
        calling_side: TeamSide,
        call: CoinFace,
        /// Decision taken by whichever side wins
        winner_decision: TossDecision,
        #[serde(default)]
        result: Option<CoinFace>,
    },
}

/// Settled toss, kept in the setup for display and replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TossOutcome {
    pub winner: TeamSide,
    pub decision: TossDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<CoinFace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin: Option<CoinFace>,
}

impl TossOutcome {
    pub fn first_batting(&self) -> TeamSide {
        match self.decision {
            TossDecision::Bat => self.winner,
            TossDecision::Bowl => self.winner.opponent(),
        }
    }
}

/// Resolved match configuration handed to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub match_id: Uuid,
    pub home: Roster,
    pub away: Roster,
    pub match_overs: u32,
    pub toss: TossOutcome,
    pub first_batting: TeamSide,
    pub first_bowling: TeamSide,
}

impl MatchSetup {
    pub fn roster(&self, side: TeamSide) -> &Roster {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn team_name(&self, side: TeamSide) -> &str {
        &self.roster(side).team_name
    }

    /// Player lookup across both sides. Ids are dense: home first, then away.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        let home_len = self.home.len();
        if id.index() < home_len {
            self.home.players.get(id.index())
        } else {
            self.away.players.get(id.index() - home_len)
        }
    }

    pub fn player_name(&self, id: PlayerId) -> &str {
        self.player(id).map(|p| p.name.as_str()).unwrap_or("?")
    }

    pub fn find_player(&self, side: TeamSide, name: &str) -> Option<PlayerId> {
        self.roster(side).find_by_name(name).map(|p| p.id)
    }

    /// Batting side for innings 1 or 2.
    pub fn batting_side(&self, innings_number: u8) -> TeamSide {
        if innings_number <= 1 {
            self.first_batting
        } else {
            self.first_bowling
        }
    }

    pub fn role(&self, side: TeamSide, innings_number: u8) -> TeamRole {
        if self.batting_side(innings_number) == side {
            TeamRole::Batting
        } else {
            TeamRole::Bowling
        }
    }
}
