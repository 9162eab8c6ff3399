//! Round progression: score recording, completion checks, and advancing
//! the tournament through its rounds.
//!
//! Americano and League fixtures exist in full from the start, so advancing
//! only moves the view cursor. Mexicano and Mix generate the next round on
//! demand once the current one is complete.

use crate::logic::mix::MixFixtureTable;
use crate::logic::{americano, league, mexicano, score};
use crate::models::{
    Format, MatchId, Round, TournamentConfig, TournamentDocument, TournamentError,
    TournamentStatus,
};

/// Derived round completion. The stored `completed` flags are caches and
/// are never consulted here.
pub fn is_round_complete(round: &Round, config: &TournamentConfig) -> bool {
    round.is_complete(config)
}

/// Generate the fixtures a tournament starts with and activate it.
/// Americano and League produce every round up front; Mexicano and Mix
/// produce round 1 only.
pub fn start_tournament(doc: &mut TournamentDocument) -> Result<(), TournamentError> {
    start_tournament_with(doc, MixFixtureTable::bundled())
}

/// [`start_tournament`] against a caller-supplied Mix table.
pub fn start_tournament_with(
    doc: &mut TournamentDocument,
    table: &MixFixtureTable,
) -> Result<(), TournamentError> {
    if doc.meta.status != TournamentStatus::Setup {
        return Err(TournamentError::InvalidState);
    }
    let config = doc.meta.config.clone();
    let rounds = match config.format {
        Format::Americano => americano::generate_rounds(&doc.entrants, config.court_count)?,
        Format::League => league::generate_rounds(&doc.entrants, config.court_count)?,
        Format::Mexicano => vec![mexicano::generate_round(1, &doc.entrants, &[], &config)?],
        Format::Mix => vec![table.round(1, &doc.entrants)?],
    };
    doc.rounds = rounds;
    doc.current_round = 1;
    doc.meta.status = TournamentStatus::Active;
    doc.touch();
    Ok(())
}

/// Record a score pair on a match: normalize the raw values, validate them
/// against the point policy, then update the match and round caches.
/// Rejected once the tournament is complete (use [`reopen`] first).
pub fn record_score(
    doc: &mut TournamentDocument,
    match_id: MatchId,
    raw_score_1: Option<f64>,
    raw_score_2: Option<f64>,
) -> Result<(), TournamentError> {
    if doc.meta.status == TournamentStatus::Completed {
        return Err(TournamentError::TournamentComplete);
    }
    let config = doc.meta.config.clone();
    score::validate(raw_score_1, raw_score_2, &config)?;

    let round = doc
        .rounds
        .iter_mut()
        .find(|r| r.matches.iter().any(|m| m.id == match_id))
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let m = round
        .matches
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.score_1 = score::normalize(raw_score_1);
    m.score_2 = score::normalize(raw_score_2);
    round.refresh_completed(&config);
    doc.touch();
    Ok(())
}

/// Advance past the current round once it is complete.
///
/// Mexicano generates the next round from the just-updated standings until
/// the configured round count is reached; Mix looks the next round up until
/// the pool stage is exhausted; Americano and League only move the cursor.
/// When no rounds remain the tournament completes and further score edits
/// are rejected.
pub fn advance_round(doc: &mut TournamentDocument) -> Result<(), TournamentError> {
    advance_round_with(doc, MixFixtureTable::bundled())
}

/// [`advance_round`] against a caller-supplied Mix table.
pub fn advance_round_with(
    doc: &mut TournamentDocument,
    table: &MixFixtureTable,
) -> Result<(), TournamentError> {
    match doc.meta.status {
        TournamentStatus::Active => {}
        TournamentStatus::Completed => return Err(TournamentError::TournamentComplete),
        TournamentStatus::Setup => return Err(TournamentError::InvalidState),
    }
    let config = doc.meta.config.clone();
    if !doc.current_round()?.is_complete(&config) {
        return Err(TournamentError::RoundNotComplete);
    }
    doc.current_round_mut()?.refresh_completed(&config);

    let played = doc.rounds.len() as u32;
    match config.format {
        Format::Americano | Format::League => {
            if doc.current_round < played {
                doc.current_round += 1;
            } else {
                doc.meta.status = TournamentStatus::Completed;
            }
        }
        Format::Mexicano => {
            let target = config
                .round_count
                .unwrap_or_else(|| doc.entrants.len().saturating_sub(1) as u32);
            if played < target {
                let next =
                    mexicano::generate_round(played + 1, &doc.entrants, &doc.rounds, &config)?;
                doc.rounds.push(next);
                doc.current_round = played + 1;
            } else {
                doc.meta.status = TournamentStatus::Completed;
            }
        }
        Format::Mix => {
            let stage_length = table.round_count(doc.entrants.len()) as u32;
            if played < stage_length {
                let next = table.round(played + 1, &doc.entrants)?;
                doc.rounds.push(next);
                doc.current_round = played + 1;
            } else {
                doc.meta.status = TournamentStatus::Completed;
            }
        }
    }
    doc.touch();
    Ok(())
}

/// Explicit override: reopen a completed tournament for score corrections.
pub fn reopen(doc: &mut TournamentDocument) -> Result<(), TournamentError> {
    if doc.meta.status != TournamentStatus::Completed {
        return Err(TournamentError::InvalidState);
    }
    doc.meta.status = TournamentStatus::Active;
    doc.touch();
    Ok(())
}
