//! Integration tests for the fairness picker and its scoring.

use badminton_game_manager::{
    game_counts, score_candidate, smart_pick, smart_pick_with_weights, GameRecord, PickError,
    Player, PlayerId, PlayerStatus, ScoreWeights,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn players(n: usize) -> Vec<Player> {
    (1..=n).map(|i| Player::new(format!("P{i}"))).collect()
}

fn resting(name: &str) -> Player {
    Player {
        status: PlayerStatus::Resting,
        ..Player::new(name)
    }
}

fn game(a0: &Player, a1: &Player, b0: &Player, b1: &Player) -> GameRecord {
    GameRecord::from_teams([a0.id, a1.id], [b0.id, b1.id])
}

#[test]
fn requires_at_least_4_active_players() {
    let mut pool = players(3);
    pool.push(resting("R"));
    assert_eq!(
        smart_pick(&pool, &[], &mut rand::thread_rng()),
        Err(PickError::InsufficientPlayers { active: 3 })
    );
}

#[test]
fn exactly_4_active_are_split_into_two_teams() {
    let mut pool = players(4);
    pool.push(resting("R"));
    let expected: HashSet<PlayerId> = pool[..4].iter().map(|p| p.id).collect();
    let matchup = smart_pick(&pool, &[], &mut StdRng::seed_from_u64(1)).unwrap();
    let picked: HashSet<PlayerId> = matchup.player_ids().into_iter().collect();
    assert_eq!(picked, expected);
}

#[test]
fn result_is_4_distinct_active_players() {
    let mut pool = players(12);
    pool[3].status = PlayerStatus::Resting;
    pool[8].status = PlayerStatus::Playing;
    let history = vec![
        game(&pool[0], &pool[1], &pool[2], &pool[4]),
        game(&pool[5], &pool[6], &pool[7], &pool[9]),
    ];
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..100 {
        let matchup = smart_pick(&pool, &history, &mut rng).unwrap();
        let ids: HashSet<PlayerId> = matchup.player_ids().into_iter().collect();
        assert_eq!(ids.len(), 4);
        for p in matchup.team_a.iter().chain(matchup.team_b.iter()) {
            assert!(p.is_active(), "{} is not active", p.name);
        }
    }
}

#[test]
fn prefers_players_with_fewer_games() {
    // P1, P2 never played; P3..P5 played 5 games each, partnering each other twice per pair.
    let pool = players(5);
    let fillers = [resting("F1"), resting("F2"), resting("F3")];
    let [p3, p4, p5] = [&pool[2], &pool[3], &pool[4]];
    let [f1, f2, f3] = [&fillers[0], &fillers[1], &fillers[2]];
    let history = vec![
        game(p3, p4, f1, f2),
        game(p3, p4, f1, f2),
        game(p4, p5, f1, f2),
        game(p4, p5, f1, f2),
        game(p3, p5, f1, f2),
        game(p3, p5, f1, f2),
        game(f1, f2, p3, f3),
        game(f1, f2, p4, f3),
        game(f1, f2, p5, f3),
    ];
    let counts = game_counts(&history);
    for p in [p3, p4, p5] {
        assert_eq!(counts[&p.id], 5);
    }

    let mut all: Vec<Player> = pool.clone();
    all.extend(fillers.iter().cloned());
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..50 {
        let matchup = smart_pick(&all, &history, &mut rng).unwrap();
        let ids: HashSet<PlayerId> = matchup.player_ids().into_iter().collect();
        assert!(ids.contains(&pool[0].id));
        assert!(ids.contains(&pool[1].id));
        let veterans = [p3, p4, p5].iter().filter(|p| ids.contains(&p.id)).count();
        assert_eq!(veterans, 2);
    }
}

#[test]
fn heavy_players_sit_out_when_the_shuffled_candidates_run() {
    // 8 active players give 16 candidates, so 6 of them are full shuffles.
    // N1, N2: no games. L1..L3: 2 games each, every pair partnered once. H1..H3: 10 games each.
    let pool = players(8);
    let (newcomers, light, heavy) = (&pool[..2], &pool[2..5], &pool[5..]);
    let fillers = [resting("F1"), resting("F2")];
    let [f1, f2] = [&fillers[0], &fillers[1]];
    let mut history = vec![
        game(&light[0], &light[1], f1, f2),
        game(&light[0], &light[2], f1, f2),
        game(&light[1], &light[2], f1, f2),
    ];
    for _ in 0..10 {
        history.push(game(&heavy[0], &heavy[1], &heavy[2], f1));
    }
    let counts = game_counts(&history);
    assert!(light.iter().all(|p| counts[&p.id] == 2));
    assert!(heavy.iter().all(|p| counts[&p.id] == 10));

    // The leading ordered candidate (N1 N2 vs L1 L2) scores 90; any lineup with a heavy
    // player scores at least 480.
    let weights = ScoreWeights::default();
    let ordered = score_candidate(
        [newcomers[0].id, newcomers[1].id],
        [light[0].id, light[1].id],
        &counts,
        &history,
        &weights,
    );
    assert_eq!(ordered, 90.0);
    let heavy_lineup = score_candidate(
        [light[0].id, light[1].id],
        [light[2].id, heavy[0].id],
        &counts,
        &history,
        &weights,
    );
    assert!(heavy_lineup >= 480.0);

    let mut all = pool.clone();
    all.extend(fillers.iter().cloned());
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..100 {
        let matchup = smart_pick(&all, &history, &mut rng).unwrap();
        let ids: HashSet<PlayerId> = matchup.player_ids().into_iter().collect();
        assert_eq!(ids.len(), 4);
        assert!(heavy.iter().all(|p| !ids.contains(&p.id)));
        assert!(newcomers.iter().any(|p| ids.contains(&p.id)));
    }
}

#[test]
fn avoids_repeating_a_partnership_when_possible() {
    // A and B partnered 3 times; with 8 fresh-ish players a split keeping them apart always exists.
    let pool = players(8);
    let history = vec![
        game(&pool[0], &pool[1], &pool[2], &pool[3]),
        game(&pool[0], &pool[1], &pool[4], &pool[5]),
        game(&pool[0], &pool[1], &pool[6], &pool[7]),
    ];
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..50 {
        let m = smart_pick(&pool, &history, &mut rng).unwrap();
        let teamed = |x: PlayerId, y: PlayerId| {
            let a = m.team_a_ids();
            let b = m.team_b_ids();
            (a.contains(&x) && a.contains(&y)) || (b.contains(&x) && b.contains(&y))
        };
        assert!(!teamed(pool[0].id, pool[1].id));
    }
}

#[test]
fn scoring_is_pure() {
    let pool = players(6);
    let history = vec![
        game(&pool[0], &pool[1], &pool[2], &pool[3]),
        game(&pool[0], &pool[4], &pool[1], &pool[5]),
    ];
    let counts = game_counts(&history);
    let weights = ScoreWeights::default();
    let a = [pool[0].id, pool[1].id];
    let b = [pool[4].id, pool[5].id];
    let first = score_candidate(a, b, &counts, &history, &weights);
    let second = score_candidate(a, b, &counts, &history, &weights);
    assert_eq!(first, second);
}

#[test]
fn score_components_match_weights() {
    let pool = players(4);
    let history = vec![game(&pool[0], &pool[1], &pool[2], &pool[3])];
    let counts = game_counts(&history);
    let weights = ScoreWeights::default();
    let ids = |i: usize, j: usize| [pool[i].id, pool[j].id];

    // Same split: no variance, two repeat pairs (50 each), exact rematch (100).
    assert_eq!(score_candidate(ids(0, 1), ids(2, 3), &counts, &history, &weights), 200.0);
    // Sides swapped and order within teams flipped is still the same matchup.
    assert_eq!(score_candidate(ids(3, 2), ids(1, 0), &counts, &history, &weights), 200.0);
    // Fresh partnerships.
    assert_eq!(score_candidate(ids(0, 2), ids(1, 3), &counts, &history, &weights), 0.0);
}

#[test]
fn game_count_spread_is_penalized() {
    let pool = players(5);
    let history = vec![
        game(&pool[0], &pool[1], &pool[2], &pool[3]),
        game(&pool[0], &pool[2], &pool[1], &pool[3]),
    ];
    let counts = game_counts(&history);
    let weights = ScoreWeights::default();
    // Counts 2, 2, 2, 0: mean 1.5, squared deviations 0.25 * 3 + 2.25 = 3.0.
    let score = score_candidate(
        [pool[0].id, pool[1].id],
        [pool[2].id, pool[4].id],
        &counts,
        &history,
        &weights,
    );
    // P1-P2 partnered once (game 1): +50. P3-P5 never: +0. No rematch.
    assert_eq!(score, 3.0 * 10.0 + 50.0);
}

#[test]
fn exact_rematch_adds_at_least_the_rematch_penalty() {
    let pool = players(4);
    let history = vec![
        game(&pool[0], &pool[1], &pool[2], &pool[3]),
        game(&pool[0], &pool[1], &pool[2], &pool[3]),
    ];
    let counts = game_counts(&history);
    let a = [pool[0].id, pool[1].id];
    let b = [pool[2].id, pool[3].id];
    let with_penalty = score_candidate(a, b, &counts, &history, &ScoreWeights::default());
    let without_penalty = score_candidate(
        a,
        b,
        &counts,
        &history,
        &ScoreWeights {
            exact_rematch: 0.0,
            ..ScoreWeights::default()
        },
    );
    // Flat penalty regardless of how many times the matchup was played.
    assert_eq!(with_penalty - without_penalty, 100.0);
}

#[test]
fn variance_only_weights_group_equal_game_counts() {
    // 2 newcomers and 16 veterans with 2 games each. Without partner or rematch pressure,
    // four veterans (spread 0) always beat any lineup with a newcomer.
    let pool = players(18);
    let veterans = &pool[2..];
    let mut history = Vec::new();
    for _ in 0..2 {
        for chunk in veterans.chunks(4) {
            history.push(game(&chunk[0], &chunk[1], &chunk[2], &chunk[3]));
        }
    }
    let weights = ScoreWeights {
        game_variance: 1.0,
        partner_repeat: 0.0,
        exact_rematch: 0.0,
    };
    let newcomers: HashSet<PlayerId> = [pool[0].id, pool[1].id].into_iter().collect();
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..20 {
        let m = smart_pick_with_weights(&pool, &history, &weights, &mut rng).unwrap();
        assert!(m.player_ids().iter().all(|id| !newcomers.contains(id)));
    }
}
