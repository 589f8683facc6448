//! Integration tests for loading and saving manager state.

use badminton_game_manager::{
    GameManager, JsonFileRepository, ManagerError, MemoryRepository, Player, PlayerProfile,
    PlayerStatus, Repository, Snapshot, StorageError, UpdateError,
};
use std::io::ErrorKind;
use std::path::PathBuf;
use uuid::Uuid;

fn temp_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("badminton-game-manager-{}", Uuid::new_v4()))
        .join("session.json")
}

/// Loads nothing and refuses every save.
struct ReadOnlyRepository;

impl Repository for ReadOnlyRepository {
    fn load(&self) -> Result<Snapshot, StorageError> {
        Ok(Snapshot::default())
    }

    fn save(&self, _snapshot: &Snapshot) -> Result<(), StorageError> {
        Err(std::io::Error::new(ErrorKind::PermissionDenied, "read-only").into())
    }
}

fn populated_manager() -> GameManager {
    let mut m = GameManager::new();
    for i in 1..=8 {
        m.add_player(PlayerProfile::named(format!("P{i}"))).unwrap();
    }
    let court = m.add_court("Court A");
    m.propose_smart().unwrap();
    m.confirm_proposal_on_court(court).unwrap();
    m.propose_random().unwrap();
    m
}

#[test]
fn missing_file_loads_empty_snapshot() {
    let repo = JsonFileRepository::new(temp_path());
    assert_eq!(repo.load().unwrap(), Snapshot::default());
}

#[test]
fn json_file_round_trip_restores_state_without_proposal() {
    let path = temp_path();
    let repo = JsonFileRepository::new(&path);
    let m = populated_manager();
    m.save(&repo).unwrap();
    assert!(path.exists());

    let restored = GameManager::load(m.id, &repo).unwrap();
    assert_eq!(restored.id, m.id);
    assert_eq!(restored.snapshot(), m.snapshot());
    assert!(restored.proposal.is_none());
    let playing = restored
        .players
        .iter()
        .filter(|p| p.status == PlayerStatus::Playing)
        .count();
    assert_eq!(playing, 4);

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn loads_data_saved_in_the_older_format() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let json = r#"{
        "players": [
            { "id": "00000000-0000-4000-8000-000000000001", "name": "Kim", "status": "active", "pinned": true },
            { "id": "00000000-0000-4000-8000-000000000002", "name": "Lee", "status": "resting", "skillLevel": "B" },
            { "id": "00000000-0000-4000-8000-000000000003", "name": "Park", "status": "active", "gender": "female", "ageGroup": "60s+" },
            { "id": "00000000-0000-4000-8000-000000000004", "name": "Choi", "status": "active" }
        ],
        "games": [
            {
                "id": "6f1c2a1e-2b0e-4c55-9a49-2f7d1c1e0a02",
                "teamA": ["00000000-0000-4000-8000-000000000001", "00000000-0000-4000-8000-000000000002"],
                "teamB": ["00000000-0000-4000-8000-000000000003", "00000000-0000-4000-8000-000000000004"],
                "confirmedAt": "2024-05-01T10:30:00.000Z"
            }
        ]
    }"#;
    std::fs::write(&path, json).unwrap();

    let m = GameManager::load(Uuid::new_v4(), &JsonFileRepository::new(&path)).unwrap();
    assert_eq!(m.players.len(), 4);
    assert!(m.players[0].pinned);
    assert_eq!(m.players[1].status, PlayerStatus::Resting);
    assert!(!m.players[3].pinned);
    assert!(m.courts.is_empty());
    assert_eq!(m.games.len(), 1);
    for p in &m.players {
        assert_eq!(m.game_count_of(p.id), 1);
    }

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn corrupt_file_is_a_json_error() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();
    let err = JsonFileRepository::new(&path).load().unwrap_err();
    assert!(matches!(err, StorageError::Json(_)));
    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn memory_repository_keeps_last_save() {
    let repo = MemoryRepository::default();
    assert_eq!(repo.load().unwrap(), Snapshot::default());
    let m = populated_manager();
    m.save(&repo).unwrap();
    assert_eq!(repo.load().unwrap(), m.snapshot());
}

#[test]
fn pins_on_inactive_players_are_dropped_on_load() {
    let resting = Player {
        status: PlayerStatus::Resting,
        pinned: true,
        ..Player::new("Lee")
    };
    let active = Player {
        pinned: true,
        ..Player::new("Kim")
    };
    let (resting_id, active_id) = (resting.id, active.id);
    let repo = MemoryRepository::new(Snapshot {
        players: vec![resting, active],
        ..Snapshot::default()
    });

    let mut m = GameManager::load(Uuid::new_v4(), &repo).unwrap();
    assert!(!m.get_player(resting_id).unwrap().pinned);
    assert!(m.get_player(active_id).unwrap().pinned);

    assert_eq!(m.toggle_status(resting_id), Ok(PlayerStatus::Active));
    assert!(!m.get_player(resting_id).unwrap().pinned);
}

#[test]
fn failed_save_leaves_the_manager_unchanged() {
    let mut m = populated_manager();
    let before = m.snapshot();

    let err = m
        .update_and_save(&ReadOnlyRepository, |m| {
            m.add_player(PlayerProfile::named("Late"))
        })
        .unwrap_err();
    assert!(matches!(err, UpdateError::Storage(StorageError::Io(_))));
    assert_eq!(m.snapshot(), before);
    assert!(m.proposal.is_some());

    let repo = MemoryRepository::default();
    let err = m
        .update_and_save(&repo, |m| m.remove_game(Uuid::new_v4()).map(|_| ()))
        .unwrap_err();
    assert!(matches!(err, UpdateError::Manager(ManagerError::GameNotFound(_))));
    assert_eq!(repo.load().unwrap(), Snapshot::default());

    let id = m
        .update_and_save(&repo, |m| m.add_player(PlayerProfile::named("Late")))
        .unwrap();
    assert_eq!(m.players.len(), 9);
    assert!(m.get_player(id).is_some());
    assert_eq!(repo.load().unwrap(), m.snapshot());
}
