//! Padel tournament web app: fixture engine, standings, and state sync.

pub mod logic;
pub mod models;
pub mod sync;

pub use logic::{
    advance_round, advance_round_with, is_round_complete, record_score, reopen,
    standings_from_rounds, standings_from_score_map, start_tournament, start_tournament_with,
    Standing,
};
pub use models::{
    Entrant, EntrantId, Format, GameMatch, MatchId, Mode, Round, TournamentConfig,
    TournamentDocument, TournamentError, TournamentId, TournamentMeta, TournamentStatus,
};
pub use sync::{MemoryStore, RemoteStore, StoreEvent, TournamentSession};
