//! Engine logic: score rules, standings, fixture generation, progression.

pub mod americano;
pub mod league;
pub mod mexicano;
pub mod mix;
pub mod progression;
pub mod score;
pub mod standings;

pub use progression::{
    advance_round, advance_round_with, is_round_complete, record_score, reopen, start_tournament,
    start_tournament_with,
};
pub use standings::{standings_from_rounds, standings_from_score_map, Standing};
