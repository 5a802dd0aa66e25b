//! SaveAdapter - Remote persistence with a local fallback
//!
//! Online/offline is decided once, at construction, from whether remote
//! credentials were supplied. Offline adapters only touch the local store.
//! Online adapters try the remote tables and fall back to the local store on
//! any remote failure; remote failures are logged, never returned as `Err`.
//!
//! The local store has one slot per record type, shared by every player.

use std::sync::Arc;

use chrono::Utc;
use savegame_shared::{
    AdapterConfig, GameState, LeaderboardEntry, LocalSave, PlayerName, Result,
    SaveRecord, Statistics, StatsUpdate,
};
use savegame_store::local::{read_json, write_json};
use savegame_store::{Direction, FileLocalStore, LocalStore, Query, RestTableClient, TableClient};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::outcome::SaveOutcome;

/// Remote table holding one save per player
pub const SAVES_TABLE: &str = "game_saves";
/// Remote table holding one statistics row per player
pub const STATISTICS_TABLE: &str = "game_statistics";
/// Conflict target for both tables
pub const PLAYER_COLUMN: &str = "player_name";

/// Local slot for the last save
pub const LOCAL_SAVE_KEY: &str = "gameSave";
/// Local slot for the last statistics update
pub const LOCAL_STATS_KEY: &str = "gameStats";

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Save/load facade over a remote table store and a local key-value store
#[derive(Clone)]
pub struct SaveAdapter {
    /// `None` means offline for the adapter's whole lifetime
    remote: Option<Arc<dyn TableClient>>,
    local: Arc<dyn LocalStore>,
}

impl SaveAdapter {
    /// Build the adapter from configuration.
    ///
    /// Missing remote credentials are not an error: the adapter runs offline.
    pub fn new(config: &AdapterConfig) -> Result<Self> {
        let local: Arc<dyn LocalStore> = Arc::new(FileLocalStore::new(&config.local_dir));

        let remote: Option<Arc<dyn TableClient>> = match &config.remote {
            Some(remote) => Some(Arc::new(RestTableClient::new(remote)?)),
            None => None,
        };

        Ok(Self::with_stores(remote, local))
    }

    /// Build the adapter from already constructed stores
    pub fn with_stores(remote: Option<Arc<dyn TableClient>>, local: Arc<dyn LocalStore>) -> Self {
        if remote.is_none() {
            warn!("Remote credentials not found. Running in offline mode.");
        }

        Self { remote, local }
    }

    pub fn is_offline(&self) -> bool {
        self.remote.is_none()
    }

    /// Persist a player's game state
    pub async fn save_game(&self, player: &PlayerName, state: &GameState) -> Result<SaveOutcome> {
        let Some(remote) = &self.remote else {
            self.write_local_save(player, state)?;
            return Ok(SaveOutcome::Offline);
        };

        let record = SaveRecord::new(player.clone(), state.clone(), Utc::now());
        let row = serde_json::to_value(&record)?;

        match remote.upsert(SAVES_TABLE, row, PLAYER_COLUMN).await {
            Ok(data) => {
                debug!(player = %player, "Game saved");
                Ok(SaveOutcome::Saved { data })
            }
            Err(err) => {
                error!(player = %player, error = %err, "Error saving game");
                self.write_local_save(player, state)?;
                Ok(SaveOutcome::Fallback { error: err })
            }
        }
    }

    /// Load the most recent game state for a player.
    ///
    /// The local fallback holds a single slot, so when the remote store is
    /// unavailable this returns the last locally saved state whatever its
    /// player.
    pub async fn load_game(&self, player: &PlayerName) -> Result<Option<GameState>> {
        let Some(remote) = &self.remote else {
            return self.read_local_save();
        };

        let query = Query::from_table(SAVES_TABLE)
            .eq(PLAYER_COLUMN, player.as_str())
            .order("updated_at", Direction::Descending)
            .limit(1);

        match remote.select(&query).await {
            Ok(rows) => {
                debug!(player = %player, found = !rows.is_empty(), "Game loaded");
                Ok(first_save_data(rows))
            }
            Err(err) => {
                error!(player = %player, error = %err, "Error loading game");
                self.read_local_save()
            }
        }
    }

    /// Overwrite a player's statistics, filling defaults for missing fields
    pub async fn update_statistics(
        &self,
        player: &PlayerName,
        stats: &StatsUpdate,
    ) -> Result<SaveOutcome> {
        let Some(remote) = &self.remote else {
            write_json(self.local.as_ref(), LOCAL_STATS_KEY, stats)?;
            return Ok(SaveOutcome::Offline);
        };

        let record = Statistics::from_update(player.clone(), stats, Utc::now());
        let row = serde_json::to_value(&record)?;

        match remote.upsert(STATISTICS_TABLE, row, PLAYER_COLUMN).await {
            Ok(data) => {
                debug!(player = %player, "Statistics updated");
                Ok(SaveOutcome::Saved { data })
            }
            Err(err) => {
                error!(player = %player, error = %err, "Error updating statistics");
                write_json(self.local.as_ref(), LOCAL_STATS_KEY, stats)?;
                Ok(SaveOutcome::Fallback { error: err })
            }
        }
    }

    /// Top players by total plays. Empty when offline or on remote failure.
    pub async fn get_leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let Some(remote) = &self.remote else {
            return Vec::new();
        };

        let query = Query::from_table(STATISTICS_TABLE)
            .select(&LeaderboardEntry::COLUMNS)
            .order("total_plays", Direction::Descending)
            .limit(limit);

        match remote.select(&query).await {
            Ok(rows) => rows.into_iter().filter_map(decode_leaderboard_row).collect(),
            Err(err) => {
                error!(error = %err, "Error fetching leaderboard");
                Vec::new()
            }
        }
    }

    fn write_local_save(&self, player: &PlayerName, state: &GameState) -> Result<()> {
        let slot = LocalSave {
            player_name: player.clone(),
            game_state: state.clone(),
        };
        write_json(self.local.as_ref(), LOCAL_SAVE_KEY, &slot)?;
        Ok(())
    }

    fn read_local_save(&self) -> Result<Option<GameState>> {
        let slot: Option<LocalSave> = read_json(self.local.as_ref(), LOCAL_SAVE_KEY)?;
        Ok(slot.map(|s| s.game_state))
    }
}

impl std::fmt::Debug for SaveAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveAdapter")
            .field("offline", &self.is_offline())
            .finish_non_exhaustive()
    }
}

/// Decode one statistics row, skipping rows whose columns don't fit
fn decode_leaderboard_row(row: Value) -> Option<LeaderboardEntry> {
    match serde_json::from_value::<LeaderboardEntry>(row) {
        Ok(entry) => Some(entry),
        Err(err) => {
            warn!(error = %err, "Skipping undecodable leaderboard row");
            None
        }
    }
}

/// `save_data` of the first row, treating an explicit null as no save
fn first_save_data(rows: Vec<Value>) -> Option<GameState> {
    rows.into_iter()
        .next()
        .and_then(|mut row| row.get_mut("save_data").map(Value::take))
        .filter(|data| !data.is_null())
        .map(GameState::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use savegame_store::{InMemoryLocalStore, InMemoryTableClient};
    use serde_json::json;

    fn online() -> (SaveAdapter, InMemoryTableClient, Arc<InMemoryLocalStore>) {
        let table = InMemoryTableClient::new();
        let local = Arc::new(InMemoryLocalStore::new());
        let adapter = SaveAdapter::with_stores(Some(Arc::new(table.clone())), local.clone());
        (adapter, table, local)
    }

    #[test]
    fn test_first_save_data() {
        assert_eq!(first_save_data(vec![]), None);
        assert_eq!(first_save_data(vec![json!({"save_data": null})]), None);
        assert_eq!(
            first_save_data(vec![
                json!({"save_data": {"chapter": 2}}),
                json!({"save_data": {"chapter": 1}}),
            ]),
            Some(GameState::new(json!({"chapter": 2})))
        );
    }

    #[test]
    fn test_offline_flag_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = SaveAdapter::new(&AdapterConfig::offline(dir.path())).unwrap();
        assert!(adapter.is_offline());
    }

    #[test]
    fn test_invalid_remote_url_is_rejected() {
        let config = AdapterConfig::online(
            savegame_shared::RemoteConfig::new("::not-a-url::", "anon"),
            "unused",
        );
        assert!(SaveAdapter::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_save_row_carries_chapter_and_timestamp() {
        let (adapter, table, _) = online();

        let outcome = adapter
            .save_game(&PlayerName::new("alice"), &GameState::new(json!({"chapter": 4})))
            .await
            .unwrap();
        assert_eq!(outcome.data().map(|rows| rows.len()), Some(1));

        let rows = table.rows(SAVES_TABLE);
        assert_eq!(rows[0]["chapter"], json!(4));
        assert_eq!(rows[0]["save_data"], json!({"chapter": 4}));
        assert!(rows[0]["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_load_unknown_player_is_none() {
        let (adapter, _, _) = online();
        let loaded = adapter.load_game(&PlayerName::new("nobody")).await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_statistics_fallback_stores_caller_object() {
        let (adapter, table, local) = online();
        table.set_unavailable(true);

        let stats = StatsUpdate::new().with_total_plays(2).with_ending("true-end");
        let outcome = adapter
            .update_statistics(&PlayerName::new("alice"), &stats)
            .await
            .unwrap();

        assert!(!outcome.success());
        assert!(outcome.is_offline());

        let stored: Option<Value> = read_json(&*local, LOCAL_STATS_KEY).unwrap();
        assert_eq!(
            stored,
            Some(json!({"totalPlays": 2, "endingsReached": ["true-end"]}))
        );
    }

    #[tokio::test]
    async fn test_leaderboard_failure_is_empty() {
        let (adapter, table, _) = online();
        adapter
            .update_statistics(&PlayerName::new("a"), &StatsUpdate::new().with_total_plays(1))
            .await
            .unwrap();

        table.set_unavailable(true);
        assert!(adapter.get_leaderboard(DEFAULT_LEADERBOARD_LIMIT).await.is_empty());
    }

    #[tokio::test]
    async fn test_leaderboard_skips_foreign_rows() {
        let (adapter, table, _) = online();
        for (name, plays) in [("a", 5), ("b", 3)] {
            let stats = StatsUpdate::new().with_total_plays(plays);
            adapter
                .update_statistics(&PlayerName::new(name), &stats)
                .await
                .unwrap();
        }
        table
            .upsert(
                STATISTICS_TABLE,
                json!({"player_name": "c", "total_plays": 4, "achievements": [7]}),
                PLAYER_COLUMN,
            )
            .await
            .unwrap();

        let board = adapter.get_leaderboard(DEFAULT_LEADERBOARD_LIMIT).await;
        let names: Vec<&str> = board.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
