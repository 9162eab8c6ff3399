//! Mexicano: standings-driven pairing, re-drawn every round.
//!
//! Round 1 is a random draw. Every later round ranks entrants by the
//! current standings and slices the ranked list into blocks, keeping
//! entrants of similar strength on the same court.

use crate::logic::standings::standings_from_rounds;
use crate::models::{
    Entrant, EntrantId, Format, GameMatch, Mode, Round, TournamentConfig, TournamentError,
};
use rand::seq::SliceRandom;

/// Entrants consumed per match: a block of 4 players or 2 teams.
pub fn block_size(mode: Mode) -> usize {
    match mode {
        Mode::Individual => 4,
        Mode::Team => 2,
    }
}

/// Generate round `round_number`. Round 1 shuffles; later rounds pair from
/// the standings over `prior_rounds`. Entrants beyond the last full block
/// sit out this round only.
pub fn generate_round(
    round_number: u32,
    entrants: &[Entrant],
    prior_rounds: &[Round],
    config: &TournamentConfig,
) -> Result<Round, TournamentError> {
    let block = block_size(config.mode);
    if entrants.len() < block {
        return Err(TournamentError::NotEnoughEntrants {
            required: block,
            actual: entrants.len(),
        });
    }

    let ordered: Vec<EntrantId> = if round_number <= 1 || prior_rounds.is_empty() {
        let mut ids: Vec<EntrantId> = entrants.iter().map(|e| e.id).collect();
        ids.shuffle(&mut rand::thread_rng());
        ids
    } else {
        standings_from_rounds(Format::Mexicano, entrants, prior_rounds)
            .into_iter()
            .map(|s| s.entrant_id)
            .collect()
    };

    let (matches, sitting_out) = pair_by_rank(&ordered, config.mode, config.court_count);
    Ok(Round::new(round_number, matches, sitting_out))
}

/// Pair a ranked list into matches. Within a block of four, ranks 1 & 3
/// face ranks 2 & 4 (the cross pairing); a block of two teams is rank 1
/// versus rank 2. The remainder is returned as sitting out.
pub fn pair_by_rank(
    ordered: &[EntrantId],
    mode: Mode,
    court_count: u32,
) -> (Vec<GameMatch>, Vec<EntrantId>) {
    let block = block_size(mode);
    let paired = ordered.len() - ordered.len() % block;
    let courts = court_count.max(1);

    let matches = ordered[..paired]
        .chunks_exact(block)
        .enumerate()
        .map(|(index, chunk)| {
            let court = index as u32 % courts + 1;
            match mode {
                Mode::Individual => {
                    GameMatch::new(court, vec![chunk[0], chunk[2]], vec![chunk[1], chunk[3]])
                }
                Mode::Team => GameMatch::new(court, vec![chunk[0]], vec![chunk[1]]),
            }
        })
        .collect();

    (matches, ordered[paired..].to_vec())
}
