//! Uniform random pick of four players, pinned players forced in.

use crate::logic::{PickError, GAME_SIZE};
use crate::models::Player;
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick 4 active players at random.
///
/// 1. Filter to active players (at least 4 required).
/// 2. Split into pinned / unpinned; at most 4 pinned.
/// 3. Shuffle unpinned and fill the remaining slots.
/// 4. Shuffle the combined 4 so pinned players don't always take the first slots.
pub fn random_pick<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> Result<[Player; 4], PickError> {
    let active: Vec<&Player> = players.iter().filter(|p| p.is_active()).collect();
    if active.len() < GAME_SIZE {
        return Err(PickError::InsufficientPlayers {
            active: active.len(),
        });
    }

    let (pinned, mut unpinned): (Vec<&Player>, Vec<&Player>) =
        active.iter().copied().partition(|p| p.pinned);
    if pinned.len() > GAME_SIZE {
        return Err(PickError::TooManyPinned {
            pinned: pinned.len(),
        });
    }

    let needed = GAME_SIZE - pinned.len();
    unpinned.shuffle(rng);

    let mut selected: Vec<Player> = pinned
        .into_iter()
        .chain(unpinned.into_iter().take(needed))
        .cloned()
        .collect();
    selected.shuffle(rng);

    log::debug!(
        "random pick: {:?}",
        selected.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
    );

    selected
        .try_into()
        .map_err(|short: Vec<Player>| PickError::InsufficientPlayers {
            active: short.len(),
        })
}
