//! History queries over the game log. Everything is recomputed from the log on each call.

use crate::models::{GameRecord, Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of games `player_id` appears in.
pub fn game_count_of(games: &[GameRecord], player_id: PlayerId) -> u32 {
    games.iter().filter(|g| g.contains(player_id)).count() as u32
}

/// Game count for every id that appears in history (orphaned ids included).
pub fn game_counts(games: &[GameRecord]) -> HashMap<PlayerId, u32> {
    let mut counts = HashMap::new();
    for game in games {
        for &id in &game.players {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    counts
}

/// Number of games where `a` and `b` were on the same team.
pub fn partner_count(games: &[GameRecord], a: PlayerId, b: PlayerId) -> u32 {
    games.iter().filter(|g| g.are_partners(a, b)).count() as u32
}

/// Number of games where `a` and `b` both played, regardless of side.
pub fn shared_game_count(games: &[GameRecord], a: PlayerId, b: PlayerId) -> u32 {
    if a == b {
        return 0;
    }
    games
        .iter()
        .filter(|g| g.contains(a) && g.contains(b))
        .count() as u32
}

/// Number of games where `a` and `b` were on opposite teams.
pub fn opponent_count(games: &[GameRecord], a: PlayerId, b: PlayerId) -> u32 {
    games.iter().filter(|g| g.are_opponents(a, b)).count() as u32
}

/// Number of games with exactly this team partition (side labels ignored).
pub fn exact_rematch_count(games: &[GameRecord], team_a: [PlayerId; 2], team_b: [PlayerId; 2]) -> u32 {
    games
        .iter()
        .filter(|g| g.is_matchup(team_a, team_b))
        .count() as u32
}

/// Game count of one player, for the stats view.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameStats {
    pub id: PlayerId,
    pub name: String,
    pub count: u32,
}

/// Players with at least one game, most games first. Ties keep registration order.
pub fn player_stats(players: &[Player], games: &[GameRecord]) -> Vec<PlayerGameStats> {
    let counts = game_counts(games);
    let mut stats: Vec<_> = players
        .iter()
        .filter_map(|p| {
            let count = counts.get(&p.id).copied().unwrap_or(0);
            (count > 0).then(|| PlayerGameStats {
                id: p.id,
                name: p.name.clone(),
                count,
            })
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}
