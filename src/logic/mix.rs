//! Mix: externally supplied fixture tables and knockout brackets built
//! from pool standings.
//!
//! Mix rounds are never generated on the fly; they are looked up from a
//! static table keyed by player count and round index. A bundled table
//! covers the common counts; organizers can load their own CSV.

use crate::logic::standings::Standing;
use crate::models::{
    Entrant, EntrantId, GameMatch, Round, TournamentConfig, TournamentError,
};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::OnceLock;

/// Table row as stored in CSV: 1-based player numbers.
#[derive(Debug, serde::Deserialize)]
struct TableRow {
    player_count: usize,
    round: u32,
    court: u32,
    team1_a: usize,
    team1_b: usize,
    team2_a: usize,
    team2_b: usize,
}

/// One fixture from the table, addressed by 0-based entrant ordinal.
#[derive(Clone, Copy, Debug)]
struct TableFixture {
    court: u32,
    team_1: [usize; 2],
    team_2: [usize; 2],
}

/// A static Mix fixture table: per player count, the fixtures of every
/// pool round.
pub struct MixFixtureTable {
    rounds: HashMap<usize, Vec<Vec<TableFixture>>>,
}

impl MixFixtureTable {
    /// Parse a table from CSV with columns
    /// `player_count,round,court,team1_a,team1_b,team2_a,team2_b`
    /// (player numbers 1-based).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TournamentError> {
        let mut by_count: HashMap<usize, HashMap<u32, Vec<TableFixture>>> = HashMap::new();
        let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        for record in csv_reader.deserialize() {
            let row: TableRow =
                record.map_err(|e| TournamentError::BadFixtureTable(e.to_string()))?;
            let players = [row.team1_a, row.team1_b, row.team2_a, row.team2_b];
            for p in players {
                if p < 1 || p > row.player_count {
                    return Err(TournamentError::BadFixtureTable(format!(
                        "player {} out of range for a {}-player table",
                        p, row.player_count
                    )));
                }
            }
            let distinct: HashSet<usize> = players.iter().copied().collect();
            if distinct.len() != 4 {
                return Err(TournamentError::BadFixtureTable(format!(
                    "duplicate player in fixture (round {}, court {})",
                    row.round, row.court
                )));
            }
            by_count
                .entry(row.player_count)
                .or_default()
                .entry(row.round)
                .or_default()
                .push(TableFixture {
                    court: row.court,
                    team_1: [row.team1_a - 1, row.team1_b - 1],
                    team_2: [row.team2_a - 1, row.team2_b - 1],
                });
        }

        let mut rounds = HashMap::new();
        for (count, by_round) in by_count {
            let last = by_round.keys().copied().max().unwrap_or(0);
            let mut ordered = Vec::with_capacity(last as usize);
            for number in 1..=last {
                match by_round.get(&number) {
                    Some(fixtures) => ordered.push(fixtures.clone()),
                    None => {
                        return Err(TournamentError::BadFixtureTable(format!(
                            "{}-player table is missing round {}",
                            count, number
                        )))
                    }
                }
            }
            rounds.insert(count, ordered);
        }
        Ok(Self { rounds })
    }

    /// The table shipped with the crate (8, 12 and 16 players, pools of 4).
    pub fn bundled() -> &'static MixFixtureTable {
        static BUNDLED: OnceLock<MixFixtureTable> = OnceLock::new();
        BUNDLED.get_or_init(|| {
            let raw = include_str!("../../data/mix_fixtures.csv");
            // The bundled table is validated by tests; a parse failure here
            // is a packaging defect, not a runtime condition.
            MixFixtureTable::from_reader(raw.as_bytes()).unwrap_or_else(|e| {
                log::error!("bundled mix fixture table failed to parse: {}", e);
                MixFixtureTable { rounds: HashMap::new() }
            })
        })
    }

    pub fn supported_counts(&self) -> Vec<usize> {
        let mut counts: Vec<usize> = self.rounds.keys().copied().collect();
        counts.sort_unstable();
        counts
    }

    /// Pool-stage length for a player count (0 when unsupported).
    pub fn round_count(&self, player_count: usize) -> usize {
        self.rounds.get(&player_count).map_or(0, Vec::len)
    }

    /// Materialize one table round against the given entrants.
    pub fn round(
        &self,
        round_number: u32,
        entrants: &[Entrant],
    ) -> Result<Round, TournamentError> {
        let per_count = self
            .rounds
            .get(&entrants.len())
            .ok_or(TournamentError::UnsupportedEntrantCount(entrants.len()))?;
        let fixtures = per_count
            .get(round_number as usize - 1)
            .ok_or(TournamentError::NoSuchRound(round_number))?;

        let mut sorted: Vec<&Entrant> = entrants.iter().collect();
        sorted.sort_by_key(|e| e.ordinal);
        let by_ordinal: Vec<EntrantId> = sorted.iter().map(|e| e.id).collect();

        let mut on_court: HashSet<usize> = HashSet::new();
        let matches: Vec<GameMatch> = fixtures
            .iter()
            .map(|fixture| {
                on_court.extend([
                    fixture.team_1[0],
                    fixture.team_1[1],
                    fixture.team_2[0],
                    fixture.team_2[1],
                ]);
                GameMatch::new(
                    fixture.court,
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
        Ok(Round::new(round_number, matches, sitting_out))
    }
}

/// Single-elimination bracket derived from pool standings, progressed
/// round by round as knockout scores arrive.
#[derive(Clone, Debug)]
pub struct KnockoutBracket {
    /// Bracket rounds, numbered from 1 independently of the pool stage.
    pub rounds: Vec<Round>,
    /// Played by the semifinal losers; created when the final is drawn.
    pub third_place: Option<GameMatch>,
}

impl KnockoutBracket {
    /// Seed from a single pool. Eight or more entrants: quarterfinals
    /// 1v8, 4v5, 2v7, 3v6 (bracket order keeps 1 and 2 apart until the
    /// final). Four to seven: semifinals 1v4, 2v3.
    pub fn from_single_pool(standings: &[Standing]) -> Result<Self, TournamentError> {
        let seeds: Vec<EntrantId> = standings.iter().map(|s| s.entrant_id).collect();
        let pairings: Vec<(usize, usize)> = if seeds.len() >= 8 {
            vec![(0, 7), (3, 4), (1, 6), (2, 5)]
        } else if seeds.len() >= 4 {
            vec![(0, 3), (1, 2)]
        } else {
            return Err(TournamentError::NotEnoughEntrants {
                required: 4,
                actual: seeds.len(),
            });
        };
        Ok(Self::seeded(
            pairings
                .into_iter()
                .map(|(a, b)| (seeds[a], seeds[b]))
                .collect(),
        ))
    }

    /// Seed quarterfinals across two pools: A1vB4, A2vB3, A3vB2, A4vB1.
    pub fn from_pools(
        pool_a: &[Standing],
        pool_b: &[Standing],
    ) -> Result<Self, TournamentError> {
        let smaller = pool_a.len().min(pool_b.len());
        if smaller < 4 {
            return Err(TournamentError::NotEnoughEntrants {
                required: 4,
                actual: smaller,
            });
        }
        let pairings = (0..4)
            .map(|i| (pool_a[i].entrant_id, pool_b[3 - i].entrant_id))
            .collect();
        Ok(Self::seeded(pairings))
    }

    fn seeded(pairings: Vec<(EntrantId, EntrantId)>) -> Self {
        let matches = pairings
            .into_iter()
            .enumerate()
            .map(|(court, (a, b))| GameMatch::new(court as u32 + 1, vec![a], vec![b]))
            .collect();
        Self {
            rounds: vec![Round::new(1, matches, Vec::new())],
            third_place: None,
        }
    }

    pub fn current(&self) -> &Round {
        // Constructed with at least one round; rounds are only appended.
        &self.rounds[self.rounds.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Round {
        let last = self.rounds.len() - 1;
        &mut self.rounds[last]
    }

    /// Build the next bracket round from the latest one: winners advance
    /// pairwise; advancing past the semifinals also draws the third-place
    /// match from the losers.
    pub fn advance(&mut self, config: &TournamentConfig) -> Result<(), TournamentError> {
        let latest = self.current();
        if !latest.is_complete(config) {
            return Err(TournamentError::RoundNotComplete);
        }
        if latest.matches.len() <= 1 {
            return Err(TournamentError::TournamentComplete);
        }

        let mut winners = Vec::with_capacity(latest.matches.len());
        let mut losers = Vec::with_capacity(latest.matches.len());
        for m in &latest.matches {
            let (winner, loser) = winner_loser(m)?;
            winners.push(winner);
            losers.push(loser);
        }

        if latest.matches.len() == 2 {
            self.third_place = Some(GameMatch::new(2, vec![losers[0]], vec![losers[1]]));
        }
        let next_number = self.rounds.len() as u32 + 1;
        let matches = winners
            .chunks_exact(2)
            .enumerate()
            .map(|(court, pair)| GameMatch::new(court as u32 + 1, vec![pair[0]], vec![pair[1]]))
            .collect();
        self.rounds.push(Round::new(next_number, matches, Vec::new()));
        Ok(())
    }

    /// The bracket winner, once the final has been played.
    pub fn champion(&self, config: &TournamentConfig) -> Option<EntrantId> {
        let latest = self.current();
        if latest.matches.len() != 1 || !latest.is_complete(config) {
            return None;
        }
        winner_loser(&latest.matches[0]).ok().map(|(w, _)| w)
    }
}

fn winner_loser(m: &GameMatch) -> Result<(EntrantId, EntrantId), TournamentError> {
    let (Some(s1), Some(s2)) = (m.score_1, m.score_2) else {
        return Err(TournamentError::RoundNotComplete);
    };
    if s1 == s2 {
        return Err(TournamentError::KnockoutDraw);
    }
    if s1 > s2 {
        Ok((m.team_1[0], m.team_2[0]))
    } else {
        Ok((m.team_2[0], m.team_1[0]))
    }
}
