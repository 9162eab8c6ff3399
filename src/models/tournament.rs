//! Tournament document, configuration, status, and errors.

use crate::models::entrant::{Entrant, EntrantId};
use crate::models::game::{MatchId, Round};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Exactly one score of a pair was supplied.
    BothScoresRequired,
    /// A score was negative (other than the reserved unset sentinel).
    NegativeScore,
    /// A score was not a whole number.
    FractionalScore,
    /// Under fixed-point scoring the pair did not sum to the configured total.
    WrongPointTotal { expected: u32 },
    /// Fixture or round generation refused to produce a partial round.
    NotEnoughEntrants { required: usize, actual: usize },
    /// No fixture table exists for this entrant count.
    UnsupportedEntrantCount(usize),
    /// A fixture table file could not be parsed.
    BadFixtureTable(String),
    /// The current round still has unplayed matches.
    RoundNotComplete,
    /// The tournament has reached its terminal state; edits need a reopen.
    TournamentComplete,
    /// A knockout match ended level; knockout matches need a winner.
    KnockoutDraw,
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Entrant id not present in the tournament.
    EntrantNotFound(EntrantId),
    /// Match id not present in any round.
    MatchNotFound(MatchId),
    /// `current_round` or a requested round number is out of range.
    NoSuchRound(u32),
    /// Requested tournament id has no document in the store.
    NotFound(TournamentId),
    /// A write to or read from the remote store failed.
    Persistence(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::BothScoresRequired => write!(f, "Both scores are required"),
            TournamentError::NegativeScore => write!(f, "Scores cannot be negative"),
            TournamentError::FractionalScore => write!(f, "Scores must be whole numbers"),
            TournamentError::WrongPointTotal { expected } => {
                write!(f, "Scores must add up to {}", expected)
            }
            TournamentError::NotEnoughEntrants { required, actual } => {
                write!(f, "Not enough entrants: need at least {}, have {}", required, actual)
            }
            TournamentError::UnsupportedEntrantCount(n) => {
                write!(f, "No fixture table for {} entrants", n)
            }
            TournamentError::BadFixtureTable(detail) => {
                write!(f, "Fixture table could not be read: {}", detail)
            }
            TournamentError::RoundNotComplete => {
                write!(f, "Current round still has unplayed matches")
            }
            TournamentError::TournamentComplete => write!(f, "Tournament is complete"),
            TournamentError::KnockoutDraw => write!(f, "Knockout matches cannot end in a draw"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::EntrantNotFound(_) => write!(f, "Entrant not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::NoSuchRound(n) => write!(f, "No round {}", n),
            TournamentError::NotFound(_) => write!(f, "No tournament"),
            TournamentError::Persistence(detail) => write!(f, "Store operation failed: {}", detail),
        }
    }
}

/// Tournament format, selecting the fixture strategy and standings comparator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Americano,
    Mexicano,
    Mix,
    League,
}

/// Whether entrants are single players or fixed teams of two.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Individual,
    Team,
}

/// Lifecycle phase of the tournament document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Entrants being added; no fixtures yet.
    #[default]
    Setup,
    /// Fixtures generated, scores arriving round by round.
    Active,
    /// Terminal condition reached; score edits rejected unless reopened.
    Completed,
}

/// Engine configuration recognized by every format.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub format: Format,
    #[serde(default)]
    pub mode: Mode,
    pub points_per_match: u32,
    /// When set, both scores of a match must sum to `points_per_match`.
    pub fixed_points: bool,
    #[serde(default = "default_court_count")]
    pub court_count: u32,
    /// Mexicano: rounds to play before the tournament completes.
    /// Defaults to entrant count - 1 when unset.
    #[serde(default)]
    pub round_count: Option<u32>,
}

fn default_court_count() -> u32 {
    1
}

impl TournamentConfig {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            mode: Mode::Individual,
            points_per_match: 24,
            fixed_points: true,
            court_count: 1,
            round_count: None,
        }
    }
}

/// Document metadata: identity, lifecycle and configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentMeta {
    pub name: String,
    pub status: TournamentStatus,
    /// Credential authorizing write access to the document.
    pub organiser_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub config: TournamentConfig,
}

/// Root aggregate: the whole shared tournament state, persisted as one
/// document and replaced wholesale on remote updates.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentDocument {
    pub id: TournamentId,
    pub meta: TournamentMeta,
    #[serde(default, deserialize_with = "super::collection::seq_or_map")]
    pub entrants: Vec<Entrant>,
    #[serde(default, deserialize_with = "super::collection::seq_or_map")]
    pub rounds: Vec<Round>,
    /// 1-based index of the round currently on court (0 while in Setup).
    pub current_round: u32,
}

impl TournamentDocument {
    /// Create a new document in Setup with a fresh organiser key.
    pub fn new(name: impl Into<String>, config: TournamentConfig, entrants: Vec<Entrant>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            meta: TournamentMeta {
                name: name.into(),
                status: TournamentStatus::Setup,
                organiser_key: Uuid::new_v4().to_string(),
                created_at: now,
                updated_at: now,
                config,
            },
            entrants,
            rounds: Vec::new(),
            current_round: 0,
        }
    }

    /// Bump `updated_at`. Called by every mutation.
    pub fn touch(&mut self) {
        self.meta.updated_at = Utc::now();
    }

    pub fn entrant(&self, id: EntrantId) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.id == id)
    }

    /// Rename an entrant. Allowed at any time; identity is not.
    pub fn rename_entrant(
        &mut self,
        id: EntrantId,
        name: impl Into<String>,
    ) -> Result<(), TournamentError> {
        let entrant = self
            .entrants
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(TournamentError::EntrantNotFound(id))?;
        entrant.rename(name);
        Ok(())
    }

    /// The round `current_round` points at.
    pub fn current_round(&self) -> Result<&Round, TournamentError> {
        let n = self.current_round;
        self.rounds
            .iter()
            .find(|r| r.round_number == n)
            .ok_or(TournamentError::NoSuchRound(n))
    }

    pub fn current_round_mut(&mut self) -> Result<&mut Round, TournamentError> {
        let n = self.current_round;
        self.rounds
            .iter_mut()
            .find(|r| r.round_number == n)
            .ok_or(TournamentError::NoSuchRound(n))
    }

    /// Structural invariants: match entrants are known, nobody is on both
    /// sides or listed twice, and `current_round` points at a real round.
    /// Used on documents arriving from the store; a violation is reported,
    /// never auto-corrected.
    pub fn check_integrity(&self) -> Result<(), TournamentError> {
        for round in &self.rounds {
            for m in &round.matches {
                let mut seen: Vec<EntrantId> = Vec::with_capacity(4);
                for &eid in m.entrants() {
                    if self.entrant(eid).is_none() {
                        return Err(TournamentError::EntrantNotFound(eid));
                    }
                    if seen.contains(&eid) {
                        return Err(TournamentError::InvalidState);
                    }
                    seen.push(eid);
                }
            }
        }
        if self.current_round != 0
            && !self.rounds.iter().any(|r| r.round_number == self.current_round)
        {
            return Err(TournamentError::NoSuchRound(self.current_round));
        }
        Ok(())
    }
}
