use serde::{Deserialize, Serialize};
use std::fmt;

use super::team::TeamSide;

/// Stable roster identity.
///
/// Assigned once when the match rosters are built (home players first, then
/// away players, in batting-order sequence). Two players with the same name
/// are still distinct because comparisons go through the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u16);

impl PlayerId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A rostered player. Immutable once the match roster is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub side: TeamSide,
    /// Whether the player is linked to an app account (career stats target)
    #[serde(default)]
    pub has_account: bool,
    /// Opaque account reference owned by the profile collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_ref: Option<String>,
}

/// Roster entry as captured by match setup: either a bare name or a full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerEntry {
    /// Guest player typed in by the scorer
    Name(String),
    /// Player picked from a team with optional account link
    Linked(LinkedPlayer),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedPlayer {
    pub name: String,
    #[serde(default)]
    pub account_ref: Option<String>,
}

impl PlayerEntry {
    pub fn name(&self) -> &str {
        match self {
            PlayerEntry::Name(name) => name,
            PlayerEntry::Linked(linked) => &linked.name,
        }
    }

    pub fn account_ref(&self) -> Option<&str> {
        match self {
            PlayerEntry::Name(_) => None,
            PlayerEntry::Linked(linked) => linked.account_ref.as_deref(),
        }
    }
}

impl From<&str> for PlayerEntry {
    fn from(name: &str) -> Self {
        PlayerEntry::Name(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accepts_bare_name_or_record() {
        let entries: Vec<PlayerEntry> =
            serde_json::from_str(r#"["Asha", {"name": "Ravi", "account_ref": "u-42"}]"#).unwrap();
        assert_eq!(entries[0].name(), "Asha");
        assert_eq!(entries[0].account_ref(), None);
        assert_eq!(entries[1].name(), "Ravi");
        assert_eq!(entries[1].account_ref(), Some("u-42"));
    }

    #[test]
    fn test_player_id_is_transparent() {
        assert_eq!(serde_json::to_string(&PlayerId(7)).unwrap(), "7");
        assert_eq!(PlayerId(7).to_string(), "#7");
    }
}
