//! Data structures for the game manager: players, game records, courts, manager state.

mod court;
mod game;
mod manager;
mod player;

pub use court::{Court, CourtId};
pub use game::{GameId, GameRecord, Matchup};
pub use manager::{
    GameManager, ManagerError, PickPolicy, Proposal, SessionId, UpdateError,
    UNKNOWN_PLAYER_NAME,
};
pub use player::{
    AgeGroup, Gender, Player, PlayerId, PlayerProfile, PlayerStatus, SkillLevel, MAX_NAME_LEN,
};
