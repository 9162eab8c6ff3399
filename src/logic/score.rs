//! Score validation and normalization.

use crate::models::{TournamentConfig, TournamentError};

/// Reserved numeric sentinel meaning "no score yet". The remote store cannot
/// represent null on every path, so this value round-trips through storage
/// in place of one.
pub const UNSET_SCORE: f64 = -1.0;

fn is_unset(raw: Option<f64>) -> bool {
    match raw {
        None => true,
        Some(v) => v == UNSET_SCORE,
    }
}

/// Map raw store/UI input to an engine score: `None` and the unset sentinel
/// become `None`, anything else is coerced to an integer.
///
/// Callers run [`validate`] on the raw pair first; coercion here assumes a
/// non-negative whole number.
pub fn normalize(raw: Option<f64>) -> Option<u32> {
    if is_unset(raw) {
        return None;
    }
    raw.map(|v| v as u32)
}

/// Validate a candidate score pair against the format's point policy.
///
/// Both unset is valid (unplayed match). Exactly one unset, negatives and
/// fractions are rejected. Under fixed-point scoring the pair must sum to
/// `points_per_match`.
pub fn validate(
    score_1: Option<f64>,
    score_2: Option<f64>,
    config: &TournamentConfig,
) -> Result<(), TournamentError> {
    match (is_unset(score_1), is_unset(score_2)) {
        (true, true) => return Ok(()),
        (true, false) | (false, true) => return Err(TournamentError::BothScoresRequired),
        (false, false) => {}
    }
    let mut total = 0u64;
    for raw in [score_1, score_2] {
        let value = raw.unwrap_or(0.0);
        if value < 0.0 {
            return Err(TournamentError::NegativeScore);
        }
        if value.fract() != 0.0 {
            return Err(TournamentError::FractionalScore);
        }
        total += u64::from(value as u32);
    }
    if config.fixed_points && total != u64::from(config.points_per_match) {
        return Err(TournamentError::WrongPointTotal {
            expected: config.points_per_match,
        });
    }
    Ok(())
}

/// Auto-fill helper for fixed-point score entry: the other side's score.
pub fn complement(score: u32, total: u32) -> u32 {
    total.saturating_sub(score)
}
