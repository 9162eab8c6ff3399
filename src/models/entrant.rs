//! Entrant data structures: a player or a fixed team of two players.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entrant (used in matches and lookups).
pub type EntrantId = Uuid;

/// A competitor in the tournament: a player (individual modes) or a team
/// wrapping two player names (League, Mexicano team mode).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    /// Stable creation index. Fixture tables address entrants by ordinal,
    /// and it is the deterministic last-resort tiebreak in standings.
    pub ordinal: usize,
    /// First player name when this entrant is a team.
    #[serde(default)]
    pub player_1: Option<String>,
    /// Second player name when this entrant is a team.
    #[serde(default)]
    pub player_2: Option<String>,
}

impl Entrant {
    /// Create an individual player entrant.
    pub fn player(name: impl Into<String>, ordinal: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ordinal,
            player_1: None,
            player_2: None,
        }
    }

    /// Create a team entrant holding two player names.
    pub fn team(
        name: impl Into<String>,
        ordinal: usize,
        player_1: impl Into<String>,
        player_2: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ordinal,
            player_1: Some(player_1.into()),
            player_2: Some(player_2.into()),
        }
    }

    /// Rename the entrant. Identity (id and ordinal) never changes.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
