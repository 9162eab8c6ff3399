//! Standings: per-entrant aggregates and format-specific ranking.
//!
//! Standings are derived, never stored. They are recomputed from scratch
//! from the recorded matches on every query, so they cannot drift from the
//! scores. Computation is pure: identical inputs produce identical output.

use crate::models::{Entrant, EntrantId, Format, Round};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Ranked view of one entrant's performance.
#[derive(Clone, Debug, Serialize)]
pub struct Standing {
    pub entrant_id: EntrantId,
    pub name: String,
    pub ordinal: usize,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub points_diff: i64,
    /// Mexicano ranking currency: points scored.
    pub total_points: u32,
    /// Mix/League ranking currency: 3 per win, 1 per draw.
    pub tournament_points: u32,
    pub avg_score: f64,
    pub win_rate: f64,
    /// 1-based position after sorting.
    pub rank: u32,
}

#[derive(Default)]
struct Tally {
    played: u32,
    wins: u32,
    losses: u32,
    draws: u32,
    points_for: u32,
    points_against: u32,
}

impl Tally {
    /// Attribute one side's result. Every member of a 2-entrant team gets
    /// the full score credited once.
    fn record(&mut self, for_points: u32, against_points: u32) {
        self.played += 1;
        self.points_for += for_points;
        self.points_against += against_points;
        match for_points.cmp(&against_points) {
            Ordering::Greater => self.wins += 1,
            Ordering::Less => self.losses += 1,
            Ordering::Equal => self.draws += 1,
        }
    }
}

/// Compute standings from a tournament's rounds.
pub fn standings_from_rounds(
    format: Format,
    entrants: &[Entrant],
    rounds: &[Round],
) -> Vec<Standing> {
    let records = rounds.iter().flat_map(|r| &r.matches).filter_map(|m| {
        match (m.score_1, m.score_2) {
            (Some(s1), Some(s2)) => Some((m.team_1.as_slice(), m.team_2.as_slice(), s1, s2)),
            _ => None,
        }
    });
    standings_from_records(format, entrants, records)
}

/// Compute standings from a flat fixture list plus a score sheet keyed by
/// fixture index (the Americano score-entry shape).
pub fn standings_from_score_map(
    format: Format,
    entrants: &[Entrant],
    fixtures: &[(Vec<EntrantId>, Vec<EntrantId>)],
    scores: &HashMap<usize, (u32, u32)>,
) -> Vec<Standing> {
    let records = fixtures.iter().enumerate().filter_map(|(index, (team_1, team_2))| {
        scores
            .get(&index)
            .map(|&(s1, s2)| (team_1.as_slice(), team_2.as_slice(), s1, s2))
    });
    standings_from_records(format, entrants, records)
}

fn standings_from_records<'a>(
    format: Format,
    entrants: &[Entrant],
    records: impl Iterator<Item = (&'a [EntrantId], &'a [EntrantId], u32, u32)>,
) -> Vec<Standing> {
    let mut tallies: HashMap<EntrantId, Tally> = entrants
        .iter()
        .map(|e| (e.id, Tally::default()))
        .collect();

    for (team_1, team_2, s1, s2) in records {
        for id in team_1 {
            if let Some(t) = tallies.get_mut(id) {
                t.record(s1, s2);
            }
        }
        for id in team_2 {
            if let Some(t) = tallies.get_mut(id) {
                t.record(s2, s1);
            }
        }
    }

    let mut standings: Vec<Standing> = entrants
        .iter()
        .map(|e| {
            let t = &tallies[&e.id];
            let denom = t.played.max(1);
            Standing {
                entrant_id: e.id,
                name: e.name.clone(),
                ordinal: e.ordinal,
                matches_played: t.played,
                wins: t.wins,
                losses: t.losses,
                draws: t.draws,
                points_for: t.points_for,
                points_against: t.points_against,
                points_diff: i64::from(t.points_for) - i64::from(t.points_against),
                total_points: t.points_for,
                tournament_points: 3 * t.wins + t.draws,
                avg_score: f64::from(t.points_for) / f64::from(denom),
                win_rate: f64::from(t.wins) / f64::from(denom),
                rank: 0,
            }
        })
        .collect();

    standings.sort_by(|a, b| compare(format, a, b));
    for (index, standing) in standings.iter_mut().enumerate() {
        standing.rank = index as u32 + 1;
    }
    standings
}

/// Format-specific comparator. Total order: every chain falls through to
/// ordinal and entrant id, so sorting is deterministic.
fn compare(format: Format, a: &Standing, b: &Standing) -> Ordering {
    let by_format = match format {
        Format::Americano => cmp_avg_score(b, a)
            .then(b.points_diff.cmp(&a.points_diff))
            .then(b.points_for.cmp(&a.points_for)),
        Format::Mexicano => b
            .total_points
            .cmp(&a.total_points)
            .then(b.points_diff.cmp(&a.points_diff))
            .then(b.wins.cmp(&a.wins))
            // Fewer matches played ranks higher: rewards entrants with byes.
            .then(a.matches_played.cmp(&b.matches_played)),
        Format::Mix | Format::League => b
            .tournament_points
            .cmp(&a.tournament_points)
            .then(b.points_diff.cmp(&a.points_diff))
            .then(b.points_for.cmp(&a.points_for)),
    };
    by_format
        .then(a.ordinal.cmp(&b.ordinal))
        .then(a.entrant_id.cmp(&b.entrant_id))
}

/// Average score comparison via cross-multiplication, exact in integers.
fn cmp_avg_score(a: &Standing, b: &Standing) -> Ordering {
    let lhs = u64::from(a.points_for) * u64::from(b.matches_played.max(1));
    let rhs = u64::from(b.points_for) * u64::from(a.matches_played.max(1));
    lhs.cmp(&rhs)
}
