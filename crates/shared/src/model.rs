//! Record types persisted by the adapter
//!
//! Remote rows use the table's snake_case column names. The local fallback
//! slots use camelCase, matching what the game client writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Unique key for save and statistics records
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for PlayerName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Opaque game state supplied by the caller.
///
/// Only the `chapter` field is ever read; the rest is stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameState(Value);

impl GameState {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The `chapter` field, or `Null` when the state has none
    pub fn chapter(&self) -> Value {
        self.0.get("chapter").cloned().unwrap_or(Value::Null)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for GameState {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Row of the `game_saves` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub player_name: PlayerName,
    pub save_data: GameState,
    #[serde(default)]
    pub chapter: Value,
    pub updated_at: DateTime<Utc>,
}

impl SaveRecord {
    pub fn new(player_name: PlayerName, save_data: GameState, updated_at: DateTime<Utc>) -> Self {
        let chapter = save_data.chapter();
        Self {
            player_name,
            save_data,
            chapter,
            updated_at,
        }
    }
}

/// Partial statistics as supplied by the caller.
///
/// Every field is optional; missing ones get defaults when the row is built.
/// Lists keep the caller's order and duplicates, and unknown fields are kept,
/// so the local slot stores exactly what was passed. Sets are only formed
/// when building a `Statistics` row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_plays: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endings_reached: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_stats: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_total_plays(mut self, total_plays: u64) -> Self {
        self.total_plays = Some(total_plays);
        self
    }

    pub fn with_ending(mut self, ending: impl Into<String>) -> Self {
        self.endings_reached
            .get_or_insert_with(Vec::new)
            .push(ending.into());
        self
    }

    pub fn with_achievement(mut self, achievement: impl Into<String>) -> Self {
        self.achievements
            .get_or_insert_with(Vec::new)
            .push(achievement.into());
        self
    }

    pub fn with_best_stat(mut self, metric: impl Into<String>, value: Value) -> Self {
        self.best_stats
            .get_or_insert_with(Map::new)
            .insert(metric.into(), value);
        self
    }
}

/// Row of the `game_statistics` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub player_name: PlayerName,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_plays: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub endings_reached: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub achievements: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub best_stats: Map<String, Value>,
    pub updated_at: DateTime<Utc>,
}

impl Statistics {
    /// Build a full row from a partial update, filling defaults
    pub fn from_update(
        player_name: PlayerName,
        update: &StatsUpdate,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            player_name,
            total_plays: update.total_plays.unwrap_or(0),
            endings_reached: update.endings_reached.iter().flatten().cloned().collect(),
            achievements: update.achievements.iter().flatten().cloned().collect(),
            best_stats: update.best_stats.clone().unwrap_or_default(),
            updated_at,
        }
    }
}

/// Read-only projection of a statistics row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: PlayerName,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_plays: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub achievements: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub endings_reached: BTreeSet<String>,
}

impl LeaderboardEntry {
    /// Columns selected for the projection
    pub const COLUMNS: [&'static str; 4] =
        ["player_name", "total_plays", "achievements", "endings_reached"];
}

/// Content of the local save slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSave {
    pub player_name: PlayerName,
    pub game_state: GameState,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
