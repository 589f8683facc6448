//! Badminton game manager: library with models, picking logic, and persistence.

pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    custom_pick, exact_rematch_count, game_count_of, game_counts, opponent_count, partner_count,
    player_stats, random_pick, score_candidate, shared_game_count, smart_pick,
    smart_pick_with_weights, PickError, PlayerGameStats, ScoreWeights, GAME_SIZE,
};
pub use models::{
    AgeGroup, Court, CourtId, GameId, GameManager, GameRecord, Gender, ManagerError, Matchup,
    PickPolicy, Player, PlayerId, PlayerProfile, PlayerStatus, Proposal, SessionId, SkillLevel,
    UpdateError,
};
pub use storage::{JsonFileRepository, MemoryRepository, Repository, Snapshot, StorageError};
