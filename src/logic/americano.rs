//! Americano: rotating-partner fixture tables and timeslot grouping.
//!
//! Fixtures for a given entrant count are looked up from a complete table,
//! pre-computed once per supported count and cached. All rounds exist from
//! creation; the current round is purely a view cursor.

use crate::models::{Entrant, EntrantId, GameMatch, Round, TournamentError};
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Entrant counts a fixture table exists for.
pub const SUPPORTED_COUNTS: RangeInclusive<usize> = 5..=24;

/// One table entry: two partnerships, addressed by entrant ordinal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fixture {
    pub team_1: [usize; 2],
    pub team_2: [usize; 2],
}

impl Fixture {
    pub fn players(&self) -> [usize; 4] {
        [self.team_1[0], self.team_1[1], self.team_2[0], self.team_2[1]]
    }
}

/// The complete fixture table for `player_count` entrants.
///
/// Partnerships come from the circle method, so each entrant partners every
/// other at most once across the table, and exactly once whenever the
/// leftover pairing works out (counts divisible by 4).
pub fn fixture_table(player_count: usize) -> Result<&'static [Fixture], TournamentError> {
    static TABLES: OnceLock<HashMap<usize, Vec<Fixture>>> = OnceLock::new();
    let tables = TABLES.get_or_init(|| {
        SUPPORTED_COUNTS
            .map(|count| (count, build_table(count)))
            .collect()
    });
    tables
        .get(&player_count)
        .map(Vec::as_slice)
        .ok_or(TournamentError::UnsupportedEntrantCount(player_count))
}

/// Enumerate the table for one count: rotate partnerships with the circle
/// method (ghost-padding odd counts), then greedily combine disjoint
/// partnerships into 2v2 fixtures, carrying unmatched partnerships forward.
fn build_table(player_count: usize) -> Vec<Fixture> {
    let padded = if player_count % 2 == 0 {
        player_count
    } else {
        player_count + 1
    };
    let ghost = (padded > player_count).then_some(padded - 1);

    let mut ring: Vec<usize> = (1..padded).collect();
    let mut pending: Vec<(usize, usize)> = Vec::new();
    let mut fixtures = Vec::new();

    for _ in 0..padded - 1 {
        let mut pairs = Vec::with_capacity(padded / 2);
        pairs.push((0, ring[padded - 2]));
        for i in 0..padded / 2 - 1 {
            pairs.push((ring[i], ring[padded - 3 - i]));
        }
        for pair in pairs {
            if Some(pair.0) == ghost || Some(pair.1) == ghost {
                continue;
            }
            let partner = pending.iter().position(|&(a, b)| {
                a != pair.0 && a != pair.1 && b != pair.0 && b != pair.1
            });
            match partner {
                Some(index) => {
                    let other = pending.remove(index);
                    fixtures.push(Fixture {
                        team_1: [other.0, other.1],
                        team_2: [pair.0, pair.1],
                    });
                }
                None => pending.push(pair),
            }
        }
        ring.rotate_right(1);
    }
    // Partnerships left in `pending` cannot form a four-player fixture.
    fixtures
}

/// Partition fixtures into timeslots: greedy scan in table order, a fixture
/// joins the current slot iff none of its entrants already appear in it and
/// the slot holds fewer than `court_count` matches; otherwise it waits.
///
/// Conflict-free and deterministic, but not guaranteed minimal in slot
/// count.
pub fn group_into_timeslots(fixtures: &[Fixture], court_count: u32) -> Vec<Vec<Fixture>> {
    let per_slot = court_count.max(1) as usize;
    let mut remaining: Vec<Option<Fixture>> = fixtures.iter().copied().map(Some).collect();
    let mut left = fixtures.len();
    let mut slots = Vec::new();

    while left > 0 {
        let mut slot: Vec<Fixture> = Vec::new();
        let mut busy: HashSet<usize> = HashSet::new();
        for entry in &mut remaining {
            if slot.len() >= per_slot {
                break;
            }
            let Some(fixture) = *entry else { continue };
            if fixture.players().iter().any(|p| busy.contains(p)) {
                continue;
            }
            busy.extend(fixture.players());
            slot.push(fixture);
            *entry = None;
            left -= 1;
        }
        slots.push(slot);
    }
    slots
}

/// Generate the full tournament: every timeslot becomes one round, with
/// entrants not on court recorded as sitting out.
pub fn generate_rounds(
    entrants: &[Entrant],
    court_count: u32,
) -> Result<Vec<Round>, TournamentError> {
    let table = fixture_table(entrants.len())?;
    let by_ordinal = ordinal_index(entrants);
    let slots = group_into_timeslots(table, court_count);

    let rounds = slots
        .iter()
        .enumerate()
        .map(|(slot_index, slot)| {
            let mut on_court: HashSet<usize> = HashSet::new();
            let matches: Vec<GameMatch> = slot
                .iter()
                .enumerate()
                .map(|(court, fixture)| {
                    on_court.extend(fixture.players());
                    GameMatch::new(
                        court as u32 + 1,
                        vec![by_ordinal[fixture.team_1[0]], by_ordinal[fixture.team_1[1]]],
                        vec![by_ordinal[fixture.team_2[0]], by_ordinal[fixture.team_2[1]]],
                    )
                })
                .collect();
            let sitting_out: Vec<EntrantId> = entrants
                .iter()
                .filter(|e| !on_court.contains(&e.ordinal))
                .map(|e| e.id)
                .collect();
            Round::new(slot_index as u32 + 1, matches, sitting_out)
        })
        .collect();
    Ok(rounds)
}

/// The table's fixtures as entrant-id team lists, for flat keyed scoring.
pub fn fixture_teams(
    entrants: &[Entrant],
) -> Result<Vec<(Vec<EntrantId>, Vec<EntrantId>)>, TournamentError> {
    let table = fixture_table(entrants.len())?;
    let by_ordinal = ordinal_index(entrants);
    Ok(table
        .iter()
        .map(|fixture| {
            (
                vec![by_ordinal[fixture.team_1[0]], by_ordinal[fixture.team_1[1]]],
                vec![by_ordinal[fixture.team_2[0]], by_ordinal[fixture.team_2[1]]],
            )
        })
        .collect())
}

/// Entrant ids indexed by ordinal, independent of slice order.
fn ordinal_index(entrants: &[Entrant]) -> Vec<EntrantId> {
    let mut sorted: Vec<&Entrant> = entrants.iter().collect();
    sorted.sort_by_key(|e| e.ordinal);
    sorted.iter().map(|e| e.id).collect()
}
