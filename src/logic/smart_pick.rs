//! Fairness-optimizing 2v2 pick: sample candidate lineups, score them, keep the best.
//!
//! Candidates favour players with fewer games, then get scored on game-count spread,
//! repeated partnerships, and exact rematches. Lower score is better.

use crate::logic::registry::{exact_rematch_count, game_counts, partner_count};
use crate::logic::{PickError, GAME_SIZE};
use crate::models::{GameRecord, Matchup, Player, PlayerId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Weight on the sum of squared deviations of game counts within the 4.
pub const GAME_VARIANCE_WEIGHT: f64 = 10.0;
/// Weight on `partner_count²` for each team's pair.
pub const PARTNER_REPEAT_WEIGHT: f64 = 50.0;
/// Flat penalty when the exact 2v2 matchup has been played before.
pub const EXACT_REMATCH_PENALTY: f64 = 100.0;

/// Upper bound on candidates evaluated per pick.
pub const MAX_CANDIDATES: usize = 50;
/// Candidates per active player, capped by `MAX_CANDIDATES`.
pub const CANDIDATES_PER_PLAYER: usize = 2;
/// Leading candidates built from the game-count order rather than a full shuffle.
pub const ORDERED_CANDIDATES: usize = 10;

/// Scoring weights. The default uses the constants above.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreWeights {
    pub game_variance: f64,
    pub partner_repeat: f64,
    pub exact_rematch: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            game_variance: GAME_VARIANCE_WEIGHT,
            partner_repeat: PARTNER_REPEAT_WEIGHT,
            exact_rematch: EXACT_REMATCH_PENALTY,
        }
    }
}

/// Score one candidate split. Pure: same inputs, same score.
///
/// `game_counts` must come from the same `games`; ids missing from it count as 0 games.
pub fn score_candidate(
    team_a: [PlayerId; 2],
    team_b: [PlayerId; 2],
    game_counts: &HashMap<PlayerId, u32>,
    games: &[GameRecord],
    weights: &ScoreWeights,
) -> f64 {
    let counts: Vec<f64> = team_a
        .iter()
        .chain(team_b.iter())
        .map(|id| game_counts.get(id).copied().unwrap_or(0) as f64)
        .collect();
    let mean = counts.iter().sum::<f64>() / counts.len() as f64;
    let variance: f64 = counts.iter().map(|c| (c - mean).powi(2)).sum();

    let partner_penalty = |pair: [PlayerId; 2]| {
        let n = partner_count(games, pair[0], pair[1]) as f64;
        n * n * weights.partner_repeat
    };

    let mut score = variance * weights.game_variance;
    score += partner_penalty(team_a);
    score += partner_penalty(team_b);
    if exact_rematch_count(games, team_a, team_b) > 0 {
        score += weights.exact_rematch;
    }
    score
}

/// Pick a 2v2 matchup from active players with the default weights.
pub fn smart_pick<R: Rng + ?Sized>(
    players: &[Player],
    games: &[GameRecord],
    rng: &mut R,
) -> Result<Matchup, PickError> {
    smart_pick_with_weights(players, games, &ScoreWeights::default(), rng)
}

/// Pick a 2v2 matchup from active players.
///
/// 1. Filter to active players (at least 4 required).
/// 2. Stable-sort by game count, fewest first.
/// 3. Build `min(MAX_CANDIDATES, CANDIDATES_PER_PLAYER * active)` candidates: the first
///    `ORDERED_CANDIDATES` keep the sorted head and jitter the tail, the rest are full shuffles.
/// 4. Split each candidate `[0, 1]` vs `[2, 3]`, score, keep the lowest (earliest wins ties).
pub fn smart_pick_with_weights<R: Rng + ?Sized>(
    players: &[Player],
    games: &[GameRecord],
    weights: &ScoreWeights,
    rng: &mut R,
) -> Result<Matchup, PickError> {
    let active: Vec<&Player> = players.iter().filter(|p| p.is_active()).collect();
    if active.len() < GAME_SIZE {
        return Err(PickError::InsufficientPlayers {
            active: active.len(),
        });
    }

    let counts = game_counts(games);
    let count_of = |p: &Player| counts.get(&p.id).copied().unwrap_or(0);

    let mut sorted_by_games = active.clone();
    sorted_by_games.sort_by_key(|p| count_of(*p));

    let attempts = MAX_CANDIDATES.min(active.len() * CANDIDATES_PER_PLAYER);
    let mut best: Option<([&Player; 4], f64)> = None;

    for i in 0..attempts {
        let order = if i < ORDERED_CANDIDATES {
            let mut order = sorted_by_games.clone();
            if i > 0 {
                let len = order.len();
                for j in GAME_SIZE..len {
                    let k = rng.gen_range(GAME_SIZE..len);
                    order.swap(j, k);
                }
            }
            order
        } else {
            let mut order = active.clone();
            order.shuffle(rng);
            order
        };

        let candidate = [order[0], order[1], order[2], order[3]];
        let score = score_candidate(
            [candidate[0].id, candidate[1].id],
            [candidate[2].id, candidate[3].id],
            &counts,
            games,
            weights,
        );
        if best.as_ref().map_or(true, |(_, s)| score < *s) {
            best = Some((candidate, score));
        }
    }

    let ([a0, a1, b0, b1], score) = best.ok_or(PickError::InsufficientPlayers {
        active: active.len(),
    })?;
    log::debug!(
        "smart pick: {} & {} vs {} & {} (score {:.1}, {} candidates)",
        a0.name,
        a1.name,
        b0.name,
        b1.name,
        score,
        attempts
    );
    Ok(Matchup {
        team_a: [a0.clone(), a1.clone()],
        team_b: [b0.clone(), b1.clone()],
    })
}
