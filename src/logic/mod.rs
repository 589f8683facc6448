//! Picking logic: history queries, random / smart / custom pickers.

mod custom_pick;
mod random_pick;
pub mod registry;
mod smart_pick;

use crate::models::PlayerId;

pub use custom_pick::custom_pick;
pub use random_pick::random_pick;
pub use registry::{
    exact_rematch_count, game_count_of, game_counts, opponent_count, partner_count, player_stats,
    shared_game_count, PlayerGameStats,
};
pub use smart_pick::{
    score_candidate, smart_pick, smart_pick_with_weights, ScoreWeights, CANDIDATES_PER_PLAYER,
    EXACT_REMATCH_PENALTY, GAME_VARIANCE_WEIGHT, MAX_CANDIDATES, ORDERED_CANDIDATES,
    PARTNER_REPEAT_WEIGHT,
};

/// Players needed for one game.
pub const GAME_SIZE: usize = 4;

/// Errors raised by the pickers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PickError {
    /// Fewer than 4 active players.
    InsufficientPlayers { active: usize },
    /// More than 4 active players are pinned.
    TooManyPinned { pinned: usize },
    /// The same player was selected twice (custom pick).
    DuplicatePlayer(PlayerId),
    /// Selected id is not in the pool (custom pick).
    PlayerNotFound(PlayerId),
    /// Selected player is resting or on a court (custom pick).
    PlayerNotActive(PlayerId),
}

impl std::fmt::Display for PickError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickError::InsufficientPlayers { active } => {
                write!(f, "Need at least 4 active players (currently {})", active)
            }
            PickError::TooManyPinned { pinned } => write!(
                f,
                "Unpin players until at most 4 remain pinned (currently {})",
                pinned
            ),
            PickError::DuplicatePlayer(_) => write!(f, "A player was selected more than once"),
            PickError::PlayerNotFound(_) => write!(f, "Player not found"),
            PickError::PlayerNotActive(_) => write!(f, "Only active players can be selected"),
        }
    }
}

impl std::error::Error for PickError {}
