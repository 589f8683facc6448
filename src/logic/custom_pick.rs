//! Hand-picked lineup: the organizer chooses all four players.

use crate::logic::PickError;
use crate::models::{Player, PlayerId};

/// Resolve four hand-picked ids into players. Order is kept as team order (`[0, 1]` vs `[2, 3]`).
pub fn custom_pick(players: &[Player], ids: [PlayerId; 4]) -> Result<[Player; 4], PickError> {
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return Err(PickError::DuplicatePlayer(*id));
        }
    }

    let resolve = |id: PlayerId| -> Result<Player, PickError> {
        let player = players
            .iter()
            .find(|p| p.id == id)
            .ok_or(PickError::PlayerNotFound(id))?;
        if !player.is_active() {
            return Err(PickError::PlayerNotActive(id));
        }
        Ok(player.clone())
    };

    Ok([
        resolve(ids[0])?,
        resolve(ids[1])?,
        resolve(ids[2])?,
        resolve(ids[3])?,
    ])
}
