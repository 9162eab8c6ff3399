//! Data structures for the tournament engine: entrants, matches, documents.

pub(crate) mod collection;
mod entrant;
mod game;
mod tournament;

pub use entrant::{Entrant, EntrantId};
pub use game::{GameMatch, MatchId, Round};
pub use tournament::{
    Format, Mode, TournamentConfig, TournamentDocument, TournamentError, TournamentId,
    TournamentMeta, TournamentStatus,
};
