//! Confirmed game records and proposed 2v2 matchups.

use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a confirmed game.
pub type GameId = Uuid;

/// A confirmed game. Immutable once created; only deletion is allowed.
///
/// `players` is the flattened team order `[team_a0, team_a1, team_b0, team_b1]`.
/// Records saved in the older `{teamA, teamB}` shape are normalized on load.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawGameRecord")]
pub struct GameRecord {
    pub id: GameId,
    pub players: [PlayerId; 4],
    pub confirmed_at: DateTime<Utc>,
}

/// Any stored shape of a game record.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawGameRecord {
    #[serde(rename_all = "camelCase")]
    Current {
        id: GameId,
        players: [PlayerId; 4],
        confirmed_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Legacy {
        id: GameId,
        team_a: [PlayerId; 2],
        team_b: [PlayerId; 2],
        confirmed_at: DateTime<Utc>,
    },
}

impl From<RawGameRecord> for GameRecord {
    fn from(raw: RawGameRecord) -> Self {
        match raw {
            RawGameRecord::Current {
                id,
                players,
                confirmed_at,
            } => Self {
                id,
                players,
                confirmed_at,
            },
            RawGameRecord::Legacy {
                id,
                team_a,
                team_b,
                confirmed_at,
            } => Self {
                id,
                players: [team_a[0], team_a[1], team_b[0], team_b[1]],
                confirmed_at,
            },
        }
    }
}

impl GameRecord {
    /// New record confirmed now.
    pub fn new(players: [PlayerId; 4]) -> Self {
        Self {
            id: Uuid::new_v4(),
            players,
            confirmed_at: Utc::now(),
        }
    }

    pub fn from_teams(team_a: [PlayerId; 2], team_b: [PlayerId; 2]) -> Self {
        Self::new([team_a[0], team_a[1], team_b[0], team_b[1]])
    }

    pub fn team_a(&self) -> [PlayerId; 2] {
        [self.players[0], self.players[1]]
    }

    pub fn team_b(&self) -> [PlayerId; 2] {
        [self.players[2], self.players[3]]
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains(&id)
    }

    fn side_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|&p| p == id).map(|i| i / 2)
    }

    /// Both ids present and on the same team.
    pub fn are_partners(&self, a: PlayerId, b: PlayerId) -> bool {
        a != b && matches!((self.side_of(a), self.side_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// Both ids present and on opposite teams.
    pub fn are_opponents(&self, a: PlayerId, b: PlayerId) -> bool {
        matches!((self.side_of(a), self.side_of(b)), (Some(x), Some(y)) if x != y)
    }

    /// Same team partition as `{team_a, team_b}`, ignoring side labels and order within a team.
    pub fn is_matchup(&self, team_a: [PlayerId; 2], team_b: [PlayerId; 2]) -> bool {
        let same = |x: [PlayerId; 2], y: [PlayerId; 2]| {
            (x[0] == y[0] && x[1] == y[1]) || (x[0] == y[1] && x[1] == y[0])
        };
        (same(self.team_a(), team_a) && same(self.team_b(), team_b))
            || (same(self.team_a(), team_b) && same(self.team_b(), team_a))
    }
}

/// A proposed 2v2 split of four players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub team_a: [Player; 2],
    pub team_b: [Player; 2],
}

impl Matchup {
    /// Split four players in order: `[0, 1]` vs `[2, 3]`.
    pub fn from_four(players: [Player; 4]) -> Self {
        let [a0, a1, b0, b1] = players;
        Self {
            team_a: [a0, a1],
            team_b: [b0, b1],
        }
    }

    pub fn team_a_ids(&self) -> [PlayerId; 2] {
        [self.team_a[0].id, self.team_a[1].id]
    }

    pub fn team_b_ids(&self) -> [PlayerId; 2] {
        [self.team_b[0].id, self.team_b[1].id]
    }

    /// Flattened ids in team order, as stored in a `GameRecord`.
    pub fn player_ids(&self) -> [PlayerId; 4] {
        let [a0, a1] = self.team_a_ids();
        let [b0, b1] = self.team_b_ids();
        [a0, a1, b0, b1]
    }
}
