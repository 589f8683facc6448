//! GameManager: player pool, game log, courts, and the pick → confirm/reject flow.

use crate::logic::{self, PickError, PlayerGameStats};
use crate::models::court::{Court, CourtId};
use crate::models::game::{GameId, GameRecord, Matchup};
use crate::models::player::{Player, PlayerId, PlayerProfile, PlayerStatus, MAX_NAME_LEN};
use crate::storage::{Repository, Snapshot, StorageError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label shown for ids that no longer resolve to a registered player.
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown";

/// Errors that can occur during game manager operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ManagerError {
    /// A picker could not produce a lineup.
    Pick(PickError),
    /// Name is empty or longer than 20 characters after trimming.
    InvalidName,
    PlayerNotFound(PlayerId),
    /// Player is leased to a court; end that game first.
    PlayerOnCourt(PlayerId),
    /// Only active players can be pinned.
    PinRequiresActive(PlayerId),
    GameNotFound(GameId),
    CourtNotFound(CourtId),
    /// Court already has a game in progress.
    CourtOccupied(CourtId),
    /// Court has no game in progress.
    CourtFree(CourtId),
    /// There is no proposal to confirm, reject, or cancel.
    NoProposal,
}

impl std::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManagerError::Pick(e) => write!(f, "{}", e),
            ManagerError::InvalidName => {
                write!(f, "Name must be between 1 and {} characters", MAX_NAME_LEN)
            }
            ManagerError::PlayerNotFound(_) => write!(f, "Player not found"),
            ManagerError::PlayerOnCourt(_) => {
                write!(f, "Player is on a court; end that game first")
            }
            ManagerError::PinRequiresActive(_) => write!(f, "Only active players can be pinned"),
            ManagerError::GameNotFound(_) => write!(f, "Game not found"),
            ManagerError::CourtNotFound(_) => write!(f, "Court not found"),
            ManagerError::CourtOccupied(_) => write!(f, "Court already has a game in progress"),
            ManagerError::CourtFree(_) => write!(f, "Court has no game in progress"),
            ManagerError::NoProposal => write!(f, "No picked lineup to act on"),
        }
    }
}

impl std::error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManagerError::Pick(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PickError> for ManagerError {
    fn from(e: PickError) -> Self {
        ManagerError::Pick(e)
    }
}

/// Why `GameManager::update_and_save` left the manager unchanged.
#[derive(Debug)]
pub enum UpdateError {
    Manager(ManagerError),
    Storage(StorageError),
}

impl std::fmt::Display for UpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateError::Manager(e) => write!(f, "{}", e),
            UpdateError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for UpdateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpdateError::Manager(e) => Some(e),
            UpdateError::Storage(e) => Some(e),
        }
    }
}

impl From<ManagerError> for UpdateError {
    fn from(e: ManagerError) -> Self {
        UpdateError::Manager(e)
    }
}

impl From<StorageError> for UpdateError {
    fn from(e: StorageError) -> Self {
        UpdateError::Storage(e)
    }
}

/// Unique identifier for an organizer session.
pub type SessionId = Uuid;

/// Which picker produced a proposal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickPolicy {
    Random,
    Smart,
    Custom,
}

/// A picked lineup waiting for confirmation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub matchup: Matchup,
    pub policy: PickPolicy,
}

/// One organizer's state. `proposal` is `None` while idle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameManager {
    pub id: SessionId,
    pub players: Vec<Player>,
    /// Confirmed games, oldest first.
    pub games: Vec<GameRecord>,
    pub courts: Vec<Court>,
    pub proposal: Option<Proposal>,
}

impl Default for GameManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GameManager {
    /// Empty manager with a fresh id.
    pub fn new() -> Self {
        Self::with_snapshot(Uuid::new_v4(), Snapshot::default())
    }

    /// Manager restored from saved state. No proposal is restored, and pins on
    /// players that are not active are dropped.
    pub fn with_snapshot(id: SessionId, snapshot: Snapshot) -> Self {
        let mut players = snapshot.players;
        for p in players.iter_mut().filter(|p| p.pinned && !p.is_active()) {
            log::debug!("Session {}: dropped stale pin on {}", id, p.name);
            p.pinned = false;
        }
        Self {
            id,
            players,
            games: snapshot.games,
            courts: snapshot.courts,
            proposal: None,
        }
    }

    pub fn load(id: SessionId, repo: &impl Repository) -> Result<Self, StorageError> {
        let snapshot = repo.load()?;
        log::info!(
            "Loaded session {}: {} player(s), {} game(s), {} court(s)",
            id,
            snapshot.players.len(),
            snapshot.games.len(),
            snapshot.courts.len()
        );
        Ok(Self::with_snapshot(id, snapshot))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            players: self.players.clone(),
            games: self.games.clone(),
            courts: self.courts.clone(),
        }
    }

    pub fn save(&self, repo: &impl Repository) -> Result<(), StorageError> {
        repo.save(&self.snapshot())
    }

    /// Run `f` on a copy of the manager and save it. The copy replaces `self` only once
    /// the save succeeds; on any error `self` is unchanged.
    pub fn update_and_save<T, F>(
        &mut self,
        repo: &impl Repository,
        f: F,
    ) -> Result<T, UpdateError>
    where
        F: FnOnce(&mut GameManager) -> Result<T, ManagerError>,
    {
        let mut updated = self.clone();
        let out = f(&mut updated)?;
        updated.save(repo)?;
        *self = updated;
        Ok(out)
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player, ManagerError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ManagerError::PlayerNotFound(id))
    }

    /// Player name, or `UNKNOWN_PLAYER_NAME` for ids that were removed.
    pub fn display_name(&self, id: PlayerId) -> &str {
        self.get_player(id)
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PLAYER_NAME)
    }

    /// Drop the current proposal, if any. Called on every structural change to the pool.
    fn discard_proposal(&mut self) {
        if self.proposal.take().is_some() {
            log::debug!("Session {}: discarded stale proposal", self.id);
        }
    }

    // --- players ---

    /// Register a new active player. Returns its id.
    pub fn add_player(&mut self, mut profile: PlayerProfile) -> Result<PlayerId, ManagerError> {
        profile.name = profile
            .validated_name()
            .ok_or(ManagerError::InvalidName)?
            .to_string();
        let player = Player::from_profile(profile);
        let id = player.id;
        log::info!("Session {}: registered player {}", self.id, player.name);
        self.players.push(player);
        Ok(id)
    }

    /// Replace a player's name and optional attributes.
    pub fn update_player(&mut self, id: PlayerId, mut profile: PlayerProfile) -> Result<(), ManagerError> {
        profile.name = profile
            .validated_name()
            .ok_or(ManagerError::InvalidName)?
            .to_string();
        self.get_player_mut(id)?.apply_profile(profile.clone());
        if let Some(proposal) = self.proposal.as_mut() {
            for p in proposal
                .matchup
                .team_a
                .iter_mut()
                .chain(proposal.matchup.team_b.iter_mut())
                .filter(|p| p.id == id)
            {
                p.apply_profile(profile.clone());
            }
        }
        Ok(())
    }

    /// Remove a player. Past games keep the orphaned id.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, ManagerError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(ManagerError::PlayerNotFound(id))?;
        let player = self.players.remove(idx);
        self.discard_proposal();
        log::info!("Session {}: removed player {}", self.id, player.name);
        Ok(player)
    }

    /// Active ↔ resting. Resting drops the pin. Players on a court can't be toggled.
    pub fn toggle_status(&mut self, id: PlayerId) -> Result<PlayerStatus, ManagerError> {
        let player = self.get_player_mut(id)?;
        let next = match player.status {
            PlayerStatus::Active => PlayerStatus::Resting,
            PlayerStatus::Resting => PlayerStatus::Active,
            PlayerStatus::Playing => return Err(ManagerError::PlayerOnCourt(id)),
        };
        player.set_status(next);
        self.discard_proposal();
        Ok(next)
    }

    /// Flip the pin of an active player. Returns the new pin state.
    pub fn toggle_pinned(&mut self, id: PlayerId) -> Result<bool, ManagerError> {
        let player = self.get_player_mut(id)?;
        if !player.is_active() {
            return Err(ManagerError::PinRequiresActive(id));
        }
        player.pinned = !player.pinned;
        let pinned = player.pinned;
        self.discard_proposal();
        Ok(pinned)
    }

    /// Bring resting players back and clear every pin. Players on courts stay playing.
    pub fn reset_player_states(&mut self) {
        for p in &mut self.players {
            if p.status == PlayerStatus::Resting {
                p.status = PlayerStatus::Active;
            }
            p.pinned = false;
        }
        self.discard_proposal();
    }

    /// Remove every player together with the game log and court leases.
    pub fn reset_players(&mut self) {
        self.players.clear();
        self.games.clear();
        for court in &mut self.courts {
            court.release();
        }
        self.discard_proposal();
        log::info!("Session {}: player list reset", self.id);
    }

    // --- games ---

    pub fn game_count_of(&self, id: PlayerId) -> u32 {
        logic::game_count_of(&self.games, id)
    }

    pub fn player_stats(&self) -> Vec<PlayerGameStats> {
        logic::player_stats(&self.players, &self.games)
    }

    /// The last `n` games, newest first.
    pub fn recent_games(&self, n: usize) -> Vec<&GameRecord> {
        self.games.iter().rev().take(n).collect()
    }

    pub fn remove_game(&mut self, id: GameId) -> Result<GameRecord, ManagerError> {
        let idx = self
            .games
            .iter()
            .position(|g| g.id == id)
            .ok_or(ManagerError::GameNotFound(id))?;
        Ok(self.games.remove(idx))
    }

    pub fn reset_games(&mut self) {
        self.games.clear();
    }

    // --- picking ---

    pub fn propose_random(&mut self) -> Result<&Proposal, ManagerError> {
        let picked = logic::random_pick(&self.players, &mut rand::thread_rng())?;
        Ok(self.set_proposal(Matchup::from_four(picked), PickPolicy::Random))
    }

    pub fn propose_smart(&mut self) -> Result<&Proposal, ManagerError> {
        let matchup = logic::smart_pick(&self.players, &self.games, &mut rand::thread_rng())?;
        Ok(self.set_proposal(matchup, PickPolicy::Smart))
    }

    /// Propose a hand-picked lineup, in team order.
    pub fn propose_custom(&mut self, ids: [PlayerId; 4]) -> Result<&Proposal, ManagerError> {
        let picked = logic::custom_pick(&self.players, ids)?;
        Ok(self.set_proposal(Matchup::from_four(picked), PickPolicy::Custom))
    }

    fn set_proposal(&mut self, matchup: Matchup, policy: PickPolicy) -> &Proposal {
        self.proposal.insert(Proposal { matchup, policy })
    }

    /// Append the proposed lineup to the game log.
    pub fn confirm_proposal(&mut self) -> Result<GameRecord, ManagerError> {
        let proposal = self.proposal.take().ok_or(ManagerError::NoProposal)?;
        let record = GameRecord::new(proposal.matchup.player_ids());
        log::info!(
            "Session {}: confirmed game {} ({:?} pick)",
            self.id,
            record.id,
            proposal.policy
        );
        self.games.push(record.clone());
        Ok(record)
    }

    /// Confirm the proposal and start it on a free court in one step.
    pub fn confirm_proposal_on_court(&mut self, court_id: CourtId) -> Result<GameRecord, ManagerError> {
        if self.proposal.is_none() {
            return Err(ManagerError::NoProposal);
        }
        let court = self.get_court(court_id)?;
        if !court.is_free() {
            return Err(ManagerError::CourtOccupied(court_id));
        }
        let record = self.confirm_proposal()?;
        self.occupy_court(court_id, record.players)?;
        Ok(record)
    }

    /// Throw the proposal away and pick again with the same policy (hand-picked lineups re-pick at random).
    pub fn reject_proposal(&mut self) -> Result<&Proposal, ManagerError> {
        let rejected = self.proposal.take().ok_or(ManagerError::NoProposal)?;
        match rejected.policy {
            PickPolicy::Smart => self.propose_smart(),
            PickPolicy::Random | PickPolicy::Custom => self.propose_random(),
        }
    }

    pub fn cancel_proposal(&mut self) -> Result<(), ManagerError> {
        self.proposal
            .take()
            .map(|_| ())
            .ok_or(ManagerError::NoProposal)
    }

    // --- courts ---

    fn get_court(&self, id: CourtId) -> Result<&Court, ManagerError> {
        self.courts
            .iter()
            .find(|c| c.id == id)
            .ok_or(ManagerError::CourtNotFound(id))
    }

    fn get_court_mut(&mut self, id: CourtId) -> Result<&mut Court, ManagerError> {
        self.courts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ManagerError::CourtNotFound(id))
    }

    /// Add a free court. A blank name becomes "Court N", numbered past every existing
    /// court and every existing "Court N" name.
    pub fn add_court(&mut self, name: &str) -> CourtId {
        let name = match name.trim() {
            "" => format!("Court {}", self.next_court_number()),
            trimmed => trimmed.to_string(),
        };
        let court = Court::new(name);
        let id = court.id;
        self.courts.push(court);
        id
    }

    fn next_court_number(&self) -> usize {
        let highest_default = self
            .courts
            .iter()
            .filter_map(|c| c.name.strip_prefix("Court ")?.parse::<usize>().ok())
            .max()
            .unwrap_or(0);
        highest_default.max(self.courts.len()) + 1
    }

    pub fn rename_court(&mut self, id: CourtId, name: &str) -> Result<(), ManagerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ManagerError::InvalidName);
        }
        self.get_court_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Remove a free court.
    pub fn remove_court(&mut self, id: CourtId) -> Result<(), ManagerError> {
        if !self.get_court(id)?.is_free() {
            return Err(ManagerError::CourtOccupied(id));
        }
        self.courts.retain(|c| c.id != id);
        Ok(())
    }

    /// Lease a free court to four distinct active players; they become playing.
    pub fn assign_court(&mut self, court_id: CourtId, player_ids: [PlayerId; 4]) -> Result<(), ManagerError> {
        if !self.get_court(court_id)?.is_free() {
            return Err(ManagerError::CourtOccupied(court_id));
        }
        logic::custom_pick(&self.players, player_ids)?;
        self.occupy_court(court_id, player_ids)
    }

    fn occupy_court(&mut self, court_id: CourtId, player_ids: [PlayerId; 4]) -> Result<(), ManagerError> {
        self.get_court_mut(court_id)?.occupy(player_ids);
        for p in self.players.iter_mut().filter(|p| player_ids.contains(&p.id)) {
            p.set_status(PlayerStatus::Playing);
        }
        self.discard_proposal();
        log::info!("Session {}: game started on court {}", self.id, court_id);
        Ok(())
    }

    /// End the court's game; its players that are still playing become active again.
    pub fn end_court_game(&mut self, court_id: CourtId) -> Result<(), ManagerError> {
        let released = self
            .get_court_mut(court_id)?
            .release()
            .ok_or(ManagerError::CourtFree(court_id))?;
        self.release_players(&released);
        self.discard_proposal();
        log::info!("Session {}: game ended on court {}", self.id, court_id);
        Ok(())
    }

    /// End every court game and remove all courts.
    pub fn reset_courts(&mut self) {
        let released: Vec<PlayerId> = self
            .courts
            .iter_mut()
            .filter_map(|c| c.release())
            .flatten()
            .collect();
        self.release_players(&released);
        self.courts.clear();
        self.discard_proposal();
    }

    fn release_players(&mut self, ids: &[PlayerId]) {
        for p in self.players.iter_mut().filter(|p| ids.contains(&p.id)) {
            if p.status == PlayerStatus::Playing {
                p.status = PlayerStatus::Active;
            }
        }
    }
}
