//! League: classic round-robin over fixed teams (circle method).
//!
//! All rounds are generated up front. For odd team counts a bye slot is
//! injected and rotates through every team once.

use crate::models::{Entrant, GameMatch, Round, TournamentError};

/// Generate the full round-robin schedule: one team fixed, the rest rotate.
/// N even: N-1 rounds of N/2 matches. N odd: N rounds of (N-1)/2 matches
/// with exactly one team byed per round (recorded as sitting out).
pub fn generate_rounds(
    teams: &[Entrant],
    court_count: u32,
) -> Result<Vec<Round>, TournamentError> {
    if teams.len() < 2 {
        return Err(TournamentError::NotEnoughEntrants {
            required: 2,
            actual: teams.len(),
        });
    }

    let n = teams.len();
    let padded = if n % 2 == 0 { n } else { n + 1 };
    let bye = (padded > n).then_some(padded - 1);
    let courts = court_count.max(1);

    let mut ring: Vec<usize> = (1..padded).collect();
    let mut rounds = Vec::with_capacity(padded - 1);

    for round_index in 0..padded - 1 {
        let mut pairs = Vec::with_capacity(padded / 2);
        pairs.push((0, ring[padded - 2]));
        for i in 0..padded / 2 - 1 {
            pairs.push((ring[i], ring[padded - 3 - i]));
        }

        let mut matches = Vec::new();
        let mut sitting_out = Vec::new();
        for (a, b) in pairs {
            if Some(a) == bye {
                sitting_out.push(teams[b].id);
                continue;
            }
            if Some(b) == bye {
                sitting_out.push(teams[a].id);
                continue;
            }
            let court = matches.len() as u32 % courts + 1;
            matches.push(GameMatch::new(court, vec![teams[a].id], vec![teams[b].id]));
        }
        rounds.push(Round::new(round_index as u32 + 1, matches, sitting_out));
        ring.rotate_right(1);
    }
    Ok(rounds)
}
