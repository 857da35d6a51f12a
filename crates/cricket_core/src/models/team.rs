use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::{Player, PlayerId};

/// Opaque side tag, mapped to real team names at match setup.
///
/// `Home` is the scorer's own team, `Away` the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

impl TeamSide {
    #[inline]
    pub fn opponent(&self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    #[inline]
    pub fn is_home(&self) -> bool {
        matches!(self, TeamSide::Home)
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::Home => write!(f, "home"),
            TeamSide::Away => write!(f, "away"),
        }
    }
}

/// Role of a side within one innings. Flips exactly once, at the innings break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Batting,
    Bowling,
}

/// One side's ordered roster (batting order as entered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub side: TeamSide,
    pub team_name: String,
    pub players: Vec<Player>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// First player with the given name. Names are unique within a side.
    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Wickets that end the innings: one batter is always left not out,
    /// and the side can lose at most `cap` wickets.
    pub fn max_wickets(&self, cap: u32) -> u32 {
        let last_man = self.players.len().saturating_sub(1) as u32;
        last_man.min(cap)
    }
}
