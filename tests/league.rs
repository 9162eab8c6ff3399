//! League round-robin schedules: circle method with bye handling.

use padel_tournament_web::logic::league::generate_rounds;
use padel_tournament_web::{Entrant, TournamentError};
use std::collections::{HashMap, HashSet};

fn teams(n: usize) -> Vec<Entrant> {
    (0..n)
        .map(|i| Entrant::team(format!("T{i}"), i, format!("A{i}"), format!("B{i}")))
        .collect()
}

#[test]
fn even_count_yields_n_minus_1_full_rounds() {
    let t = teams(6);
    let rounds = generate_rounds(&t, 3).unwrap();
    assert_eq!(rounds.len(), 5);
    for round in &rounds {
        assert_eq!(round.matches.len(), 3);
        assert!(round.sitting_out.is_empty());
        let mut seen = HashSet::new();
        for m in &round.matches {
            for id in m.entrants() {
                assert!(seen.insert(*id), "team repeated within a round");
            }
        }
        assert_eq!(seen.len(), 6);
    }
}

#[test]
fn odd_count_yields_n_rounds_with_one_bye_each() {
    let t = teams(7);
    let rounds = generate_rounds(&t, 3).unwrap();
    assert_eq!(rounds.len(), 7);

    let mut byes: HashMap<_, usize> = HashMap::new();
    for round in &rounds {
        assert_eq!(round.matches.len(), 3);
        assert_eq!(round.sitting_out.len(), 1);
        *byes.entry(round.sitting_out[0]).or_default() += 1;
    }
    // The bye rotates through every team exactly once.
    assert_eq!(byes.len(), 7);
    assert!(byes.values().all(|&count| count == 1));
}

#[test]
fn everyone_plays_everyone_exactly_once() {
    for n in [4, 5, 8, 9] {
        let t = teams(n);
        let rounds = generate_rounds(&t, 4).unwrap();
        let mut met: HashMap<(usize, usize), usize> = HashMap::new();
        let ordinal_of: HashMap<_, usize> = t.iter().map(|e| (e.id, e.ordinal)).collect();
        for round in &rounds {
            for m in &round.matches {
                let a = ordinal_of[&m.team_1[0]];
                let b = ordinal_of[&m.team_2[0]];
                *met.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }
        assert_eq!(met.len(), n * (n - 1) / 2);
        assert!(met.values().all(|&count| count == 1));
    }
}

#[test]
fn one_team_is_not_a_league() {
    let t = teams(1);
    assert!(matches!(
        generate_rounds(&t, 1),
        Err(TournamentError::NotEnoughEntrants { required: 2, actual: 1 })
    ));
}
