//! Mexicano pairing: random first round, standings-driven later rounds.

use padel_tournament_web::logic::mexicano::{generate_round, pair_by_rank};
use padel_tournament_web::{
    Entrant, EntrantId, Format, GameMatch, Mode, Round, TournamentConfig, TournamentError,
};
use std::collections::{BTreeSet, HashSet};

fn players(n: usize) -> Vec<Entrant> {
    (0..n)
        .map(|i| Entrant::player(format!("P{i}"), i))
        .collect()
}

fn config() -> TournamentConfig {
    let mut config = TournamentConfig::new(Format::Mexicano);
    config.court_count = 2;
    config
}

fn team_config() -> TournamentConfig {
    let mut config = config();
    config.mode = Mode::Team;
    config
}

#[test]
fn too_few_entrants_never_produces_a_partial_round() {
    let e = players(3);
    assert!(matches!(
        generate_round(1, &e, &[], &config()),
        Err(TournamentError::NotEnoughEntrants { required: 4, actual: 3 })
    ));
    let t = players(1);
    assert!(matches!(
        generate_round(1, &t, &[], &team_config()),
        Err(TournamentError::NotEnoughEntrants { required: 2, actual: 1 })
    ));
}

#[test]
fn round_one_uses_everyone_divisible_by_block() {
    let e = players(9);
    let round = generate_round(1, &e, &[], &config()).unwrap();
    assert_eq!(round.matches.len(), 2);
    assert_eq!(round.sitting_out.len(), 1);
    let mut seen: HashSet<EntrantId> = HashSet::new();
    for m in &round.matches {
        assert_eq!(m.team_1.len(), 2);
        assert_eq!(m.team_2.len(), 2);
        for id in m.entrants() {
            assert!(seen.insert(*id));
        }
    }
    assert!(!seen.contains(&round.sitting_out[0]));
}

#[test]
fn round_one_is_shuffled() {
    let e = players(8);
    let mut drawn: BTreeSet<Vec<EntrantId>> = BTreeSet::new();
    for _ in 0..10 {
        let round = generate_round(1, &e, &[], &config()).unwrap();
        let mut teams: Vec<EntrantId> = Vec::new();
        for m in &round.matches {
            teams.extend(m.team_1.iter().copied());
            teams.extend(m.team_2.iter().copied());
        }
        drawn.insert(teams);
    }
    // Ten draws over 8 players collapsing to one ordering would mean the
    // shuffle is not happening.
    assert!(drawn.len() > 1);
}

#[test]
fn ranked_list_pairs_one_and_three_against_two_and_four() {
    let e = players(8);
    let ranked: Vec<EntrantId> = e.iter().map(|p| p.id).collect();
    let (matches, sitting_out) = pair_by_rank(&ranked, Mode::Individual, 2);
    assert!(sitting_out.is_empty());
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].team_1, vec![ranked[0], ranked[2]]);
    assert_eq!(matches[0].team_2, vec![ranked[1], ranked[3]]);
    assert_eq!(matches[1].team_1, vec![ranked[4], ranked[6]]);
    assert_eq!(matches[1].team_2, vec![ranked[5], ranked[7]]);
}

#[test]
fn team_mode_pairs_adjacent_ranks() {
    let t = players(5);
    let ranked: Vec<EntrantId> = t.iter().map(|p| p.id).collect();
    let (matches, sitting_out) = pair_by_rank(&ranked, Mode::Team, 2);
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].team_1, vec![ranked[0]]);
    assert_eq!(matches[0].team_2, vec![ranked[1]]);
    assert_eq!(matches[1].team_1, vec![ranked[2]]);
    assert_eq!(matches[1].team_2, vec![ranked[3]]);
    assert_eq!(sitting_out, vec![ranked[4]]);
}

#[test]
fn later_rounds_follow_the_standings() {
    let e = players(8);
    // Round 1: (P0,P1) 16-8 (P2,P3); (P4,P5) 13-11 (P6,P7).
    // Standings: P0, P1, P4, P5, P6, P7, P2, P3.
    let mut m1 = GameMatch::new(1, vec![e[0].id, e[1].id], vec![e[2].id, e[3].id]);
    m1.score_1 = Some(16);
    m1.score_2 = Some(8);
    let mut m2 = GameMatch::new(2, vec![e[4].id, e[5].id], vec![e[6].id, e[7].id]);
    m2.score_1 = Some(13);
    m2.score_2 = Some(11);
    let prior = vec![Round::new(1, vec![m1, m2], Vec::new())];

    let round_2 = generate_round(2, &e, &prior, &config()).unwrap();
    assert_eq!(round_2.round_number, 2);
    assert_eq!(round_2.matches.len(), 2);
    // Block one: ranks 1-4 cross-paired.
    assert_eq!(round_2.matches[0].team_1, vec![e[0].id, e[4].id]);
    assert_eq!(round_2.matches[0].team_2, vec![e[1].id, e[5].id]);
    // Block two: ranks 5-8.
    assert_eq!(round_2.matches[1].team_1, vec![e[6].id, e[2].id]);
    assert_eq!(round_2.matches[1].team_2, vec![e[7].id, e[3].id]);
}

#[test]
fn sitting_out_entrants_rejoin_the_next_draw() {
    let e = players(5);
    let round_1 = generate_round(1, &e, &[], &config()).unwrap();
    assert_eq!(round_1.sitting_out.len(), 1);
    let benched = round_1.sitting_out[0];

    // Score the round so standings exist, then redraw.
    let mut prior = round_1.clone();
    for m in &mut prior.matches {
        m.score_1 = Some(14);
        m.score_2 = Some(10);
    }
    let round_2 = generate_round(2, &e, &[prior], &config()).unwrap();
    let pool: HashSet<EntrantId> = round_2
        .matches
        .iter()
        .flat_map(|m| m.entrants().copied())
        .chain(round_2.sitting_out.iter().copied())
        .collect();
    assert!(pool.contains(&benched));
}
