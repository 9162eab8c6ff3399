//! Round progression: starting, score recording, advancing, completion.

use padel_tournament_web::{
    advance_round, is_round_complete, record_score, reopen, standings_from_rounds,
    start_tournament, Entrant, Format, Mode, TournamentConfig, TournamentDocument,
    TournamentError, TournamentStatus,
};

fn players(n: usize) -> Vec<Entrant> {
    (0..n)
        .map(|i| Entrant::player(format!("P{i}"), i))
        .collect()
}

fn mexicano_doc(n: usize, rounds: u32) -> TournamentDocument {
    let mut config = TournamentConfig::new(Format::Mexicano);
    config.court_count = 2;
    config.round_count = Some(rounds);
    TournamentDocument::new("Friday night", config, players(n))
}

/// Score every match of the current round 24-0 in favour of team 1.
fn sweep_current_round(doc: &mut TournamentDocument) {
    let ids: Vec<_> = doc
        .rounds
        .iter()
        .find(|r| r.round_number == doc.current_round)
        .unwrap()
        .matches
        .iter()
        .map(|m| m.id)
        .collect();
    for id in ids {
        record_score(doc, id, Some(24.0), Some(0.0)).unwrap();
    }
}

#[test]
fn start_generates_round_one_and_activates() {
    let mut doc = mexicano_doc(8, 3);
    start_tournament(&mut doc).unwrap();
    assert_eq!(doc.meta.status, TournamentStatus::Active);
    assert_eq!(doc.rounds.len(), 1);
    assert_eq!(doc.current_round, 1);
    assert!(matches!(
        start_tournament(&mut doc),
        Err(TournamentError::InvalidState)
    ));
}

#[test]
fn americano_and_league_generate_everything_up_front() {
    let mut config = TournamentConfig::new(Format::Americano);
    config.court_count = 2;
    let mut doc = TournamentDocument::new("Club night", config, players(8));
    start_tournament(&mut doc).unwrap();
    assert!(doc.rounds.len() > 1);

    let teams: Vec<Entrant> = (0..6)
        .map(|i| Entrant::team(format!("T{i}"), i, format!("A{i}"), format!("B{i}")))
        .collect();
    let mut config = TournamentConfig::new(Format::League);
    config.mode = Mode::Team;
    config.fixed_points = false;
    config.court_count = 3;
    let mut doc = TournamentDocument::new("Winter league", config, teams);
    start_tournament(&mut doc).unwrap();
    assert_eq!(doc.rounds.len(), 5);
}

#[test]
fn record_score_validates_and_refreshes_caches() {
    let mut doc = mexicano_doc(8, 3);
    start_tournament(&mut doc).unwrap();
    let match_id = doc.rounds[0].matches[0].id;

    // Wrong sum under fixed points: rejected, nothing recorded.
    assert!(matches!(
        record_score(&mut doc, match_id, Some(16.0), Some(10.0)),
        Err(TournamentError::WrongPointTotal { expected: 24 })
    ));
    assert_eq!(doc.rounds[0].matches[0].score_1, None);

    record_score(&mut doc, match_id, Some(16.0), Some(8.0)).unwrap();
    let m = &doc.rounds[0].matches[0];
    assert_eq!(m.score_1, Some(16));
    assert_eq!(m.score_2, Some(8));
    assert!(m.completed);

    // Clearing the score reopens the match.
    record_score(&mut doc, match_id, None, None).unwrap();
    assert_eq!(doc.rounds[0].matches[0].score_1, None);
    assert!(!doc.rounds[0].matches[0].completed);
}

#[test]
fn unknown_match_is_reported() {
    let mut doc = mexicano_doc(8, 3);
    start_tournament(&mut doc).unwrap();
    let stranger = uuid::Uuid::new_v4();
    assert!(matches!(
        record_score(&mut doc, stranger, Some(16.0), Some(8.0)),
        Err(TournamentError::MatchNotFound(_))
    ));
}

#[test]
fn advance_requires_a_complete_round() {
    let mut doc = mexicano_doc(8, 3);
    start_tournament(&mut doc).unwrap();
    assert!(matches!(
        advance_round(&mut doc),
        Err(TournamentError::RoundNotComplete)
    ));
}

#[test]
fn stored_completion_flag_is_only_a_cache() {
    let mut doc = mexicano_doc(8, 3);
    start_tournament(&mut doc).unwrap();
    // A stale cache claiming completion must not let the round advance.
    doc.rounds[0].completed = true;
    for m in &mut doc.rounds[0].matches {
        m.completed = true;
    }
    assert!(!is_round_complete(&doc.rounds[0], &doc.meta.config));
    assert!(matches!(
        advance_round(&mut doc),
        Err(TournamentError::RoundNotComplete)
    ));
}

#[test]
fn mexicano_runs_to_the_configured_round_count() {
    let mut doc = mexicano_doc(8, 2);
    start_tournament(&mut doc).unwrap();

    sweep_current_round(&mut doc);
    advance_round(&mut doc).unwrap();
    assert_eq!(doc.rounds.len(), 2);
    assert_eq!(doc.current_round, 2);
    assert_eq!(doc.meta.status, TournamentStatus::Active);

    sweep_current_round(&mut doc);
    advance_round(&mut doc).unwrap();
    assert_eq!(doc.meta.status, TournamentStatus::Completed);
    assert_eq!(doc.rounds.len(), 2);

    // Completed tournaments reject edits until explicitly reopened.
    let match_id = doc.rounds[1].matches[0].id;
    assert!(matches!(
        record_score(&mut doc, match_id, Some(12.0), Some(12.0)),
        Err(TournamentError::TournamentComplete)
    ));
    reopen(&mut doc).unwrap();
    assert_eq!(doc.meta.status, TournamentStatus::Active);
    record_score(&mut doc, match_id, Some(12.0), Some(12.0)).unwrap();
}

#[test]
fn winners_climb_into_the_top_block() {
    let mut doc = mexicano_doc(8, 3);
    start_tournament(&mut doc).unwrap();

    // Entrant A wins their round-1 match emphatically; the other match
    // splits closer.
    let a = doc.entrants[0].id;
    let (a_match, other): (Vec<_>, Vec<_>) = doc.rounds[0]
        .matches
        .iter()
        .map(|m| (m.id, m.involves(a)))
        .partition(|(_, involves)| *involves);
    let a_side_first = doc.rounds[0]
        .matches
        .iter()
        .find(|m| m.involves(a))
        .map(|m| m.team_1.contains(&a))
        .unwrap();
    let (s1, s2) = if a_side_first { (24.0, 0.0) } else { (0.0, 24.0) };
    record_score(&mut doc, a_match[0].0, Some(s1), Some(s2)).unwrap();
    record_score(&mut doc, other[0].0, Some(13.0), Some(11.0)).unwrap();

    advance_round(&mut doc).unwrap();

    // A tops the standings and lands in the first pairing block.
    let standings = standings_from_rounds(Format::Mexicano, &doc.entrants, &doc.rounds[..1]);
    assert_eq!(standings[0].points_for, 24);
    let top_block = &doc.rounds[1].matches[0];
    assert!(top_block.involves(a));
}

#[test]
fn americano_cursor_walks_the_pregenerated_rounds() {
    let mut config = TournamentConfig::new(Format::Americano);
    config.court_count = 2;
    let mut doc = TournamentDocument::new("Club night", config, players(8));
    start_tournament(&mut doc).unwrap();
    let total = doc.rounds.len();

    for step in 0..total {
        sweep_current_round(&mut doc);
        advance_round(&mut doc).unwrap();
        if step + 1 < total {
            assert_eq!(doc.current_round as usize, step + 2);
            // Advancing never generates new Americano rounds.
            assert_eq!(doc.rounds.len(), total);
        }
    }
    assert_eq!(doc.meta.status, TournamentStatus::Completed);
}

#[test]
fn mix_walks_the_table_then_completes() {
    let mut config = TournamentConfig::new(Format::Mix);
    config.fixed_points = false;
    config.court_count = 2;
    let mut doc = TournamentDocument::new("Sunday mix", config, players(8));
    start_tournament(&mut doc).unwrap();
    assert_eq!(doc.rounds.len(), 1);

    for _ in 0..3 {
        sweep_current_round(&mut doc);
        advance_round(&mut doc).unwrap();
    }
    assert_eq!(doc.rounds.len(), 3);
    assert_eq!(doc.meta.status, TournamentStatus::Completed);
}
