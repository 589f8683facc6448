//! Player, profile attributes, and availability status.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in game records, courts, and lookups).
pub type PlayerId = Uuid;

/// Maximum display name length, in characters.
pub const MAX_NAME_LEN: usize = 20;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Ordinal skill tier, `S` strongest through `E`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum SkillLevel {
    S,
    A,
    B,
    C,
    D,
    E,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "10s")]
    Teens,
    #[serde(rename = "20s")]
    Twenties,
    #[serde(rename = "30s")]
    Thirties,
    #[serde(rename = "40s")]
    Forties,
    #[serde(rename = "50s")]
    Fifties,
    #[serde(rename = "60s+")]
    SixtiesPlus,
}

/// Availability of a player. Only `Active` players can be picked.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    #[default]
    Active,
    Resting,
    /// Leased to a court until that court's game is ended.
    Playing,
}

/// Editable attributes of a player (registration form / edit form).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub age_group: Option<AgeGroup>,
}

impl PlayerProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Trimmed name if it is 1 to `MAX_NAME_LEN` characters long.
    pub fn validated_name(&self) -> Option<&str> {
        let name = self.name.trim();
        let len = name.chars().count();
        (1..=MAX_NAME_LEN).contains(&len).then_some(name)
    }
}

/// A registered player in the pool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<SkillLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
    #[serde(default)]
    pub status: PlayerStatus,
    /// Forced inclusion in the next random pick. Only meaningful while active.
    #[serde(default)]
    pub pinned: bool,
}

impl Player {
    /// Create a new active, unpinned player with the given name and no optional attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            gender: None,
            skill_level: None,
            age_group: None,
            status: PlayerStatus::Active,
            pinned: false,
        }
    }

    /// Create an active player from a profile. The name is taken as-is; validation is the caller's job.
    pub fn from_profile(profile: PlayerProfile) -> Self {
        Self {
            gender: profile.gender,
            skill_level: profile.skill_level,
            age_group: profile.age_group,
            ..Self::new(profile.name)
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Replace the editable attributes. Status and pin are untouched.
    pub fn apply_profile(&mut self, profile: PlayerProfile) {
        self.name = profile.name;
        self.gender = profile.gender;
        self.skill_level = profile.skill_level;
        self.age_group = profile.age_group;
    }

    /// Change status; leaving `Active` always drops the pin.
    pub fn set_status(&mut self, status: PlayerStatus) {
        self.status = status;
        if status != PlayerStatus::Active {
            self.pinned = false;
        }
    }
}
