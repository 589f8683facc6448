//! Physical courts leased to four players at a time.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a court.
pub type CourtId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: CourtId,
    pub name: String,
    /// `None` while the court is free.
    #[serde(default)]
    pub player_ids: Option<[PlayerId; 4]>,
    #[serde(default)]
    pub game_started_at: Option<DateTime<Utc>>,
}

impl Court {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            player_ids: None,
            game_started_at: None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.player_ids.is_none()
    }

    /// Start a game on this court.
    pub fn occupy(&mut self, player_ids: [PlayerId; 4]) {
        self.player_ids = Some(player_ids);
        self.game_started_at = Some(Utc::now());
    }

    /// Free the court, returning the players who were on it.
    pub fn release(&mut self) -> Option<[PlayerId; 4]> {
        self.game_started_at = None;
        self.player_ids.take()
    }
}
