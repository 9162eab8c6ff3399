//! Match and Round structures shared by all formats.

use crate::models::entrant::EntrantId;
use crate::models::tournament::TournamentConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A single match: two sides of 1 or 2 entrant ids depending on mode.
///
/// `completed` is a cache kept for fast reads; [`GameMatch::is_completed`]
/// is the authoritative check whenever the two disagree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// Court the match is scheduled on (1-based).
    pub court: u32,
    #[serde(default, deserialize_with = "super::collection::seq_or_map")]
    pub team_1: Vec<EntrantId>,
    #[serde(default, deserialize_with = "super::collection::seq_or_map")]
    pub team_2: Vec<EntrantId>,
    /// None until recorded.
    pub score_1: Option<u32>,
    pub score_2: Option<u32>,
    pub completed: bool,
}

impl GameMatch {
    pub fn new(court: u32, team_1: Vec<EntrantId>, team_2: Vec<EntrantId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            court,
            team_1,
            team_2,
            score_1: None,
            score_2: None,
            completed: false,
        }
    }

    /// Derived completion: both scores recorded and, under fixed-point
    /// scoring, summing to the configured total.
    pub fn is_completed(&self, config: &TournamentConfig) -> bool {
        match (self.score_1, self.score_2) {
            (Some(s1), Some(s2)) => {
                !config.fixed_points
                    || u64::from(s1) + u64::from(s2) == u64::from(config.points_per_match)
            }
            _ => false,
        }
    }

    /// All entrant ids on either side.
    pub fn entrants(&self) -> impl Iterator<Item = &EntrantId> {
        self.team_1.iter().chain(self.team_2.iter())
    }

    pub fn involves(&self, id: EntrantId) -> bool {
        self.entrants().any(|&e| e == id)
    }
}

/// One round of play: the matches on court plus the entrants sitting out.
///
/// `completed` mirrors "all matches completed" and exists for fast reads;
/// derivation via [`Round::is_complete`] always wins over the stored flag.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round number.
    pub round_number: u32,
    #[serde(default, deserialize_with = "super::collection::seq_or_map")]
    pub matches: Vec<GameMatch>,
    #[serde(default, deserialize_with = "super::collection::seq_or_map")]
    pub sitting_out: Vec<EntrantId>,
    pub completed: bool,
}

impl Round {
    pub fn new(round_number: u32, matches: Vec<GameMatch>, sitting_out: Vec<EntrantId>) -> Self {
        Self {
            round_number,
            matches,
            sitting_out,
            completed: false,
        }
    }

    /// Derived completion over all matches. Ignores the cached flags.
    pub fn is_complete(&self, config: &TournamentConfig) -> bool {
        self.matches.iter().all(|m| m.is_completed(config))
    }

    /// Re-derive the cached completion flags on every match and the round.
    pub fn refresh_completed(&mut self, config: &TournamentConfig) {
        for m in &mut self.matches {
            m.completed = m.is_completed(config);
        }
        self.completed = self.matches.iter().all(|m| m.completed);
    }
}
