//! In-Memory Table Client
//!
//! A `TableClient` that keeps every table in process memory.
//! Useful for testing and development, including simulated outages.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use savegame_shared::RemoteError;
use serde_json::{Map, Value};

use crate::query::{Direction, Query};
use crate::table::TableClient;

/// In-memory table store
///
/// Thread-safe implementation using RwLock. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTableClient {
    tables: Arc<RwLock<HashMap<String, Vec<Value>>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryTableClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with `RemoteError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Snapshot of a table's rows in insertion order
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .map(|tables| tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), RemoteError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(RemoteError::Unavailable(
                "in-memory table store is switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TableClient for InMemoryTableClient {
    async fn upsert(
        &self,
        table: &str,
        row: Value,
        on_conflict: &str,
    ) -> Result<Vec<Value>, RemoteError> {
        self.check_available()?;

        let Value::Object(fields) = row else {
            return Err(RemoteError::Api {
                status: 400,
                message: "row must be a JSON object".to_string(),
            });
        };

        let key = match fields.get(on_conflict) {
            Some(key) if !key.is_null() => key.clone(),
            _ => {
                return Err(RemoteError::Api {
                    status: 400,
                    message: format!("conflict column '{}' missing from row", on_conflict),
                })
            }
        };

        let mut tables = self
            .tables
            .write()
            .map_err(|_| RemoteError::Unavailable("Failed to acquire write lock".to_string()))?;
        let rows = tables.entry(table.to_string()).or_default();

        let existing = rows
            .iter()
            .position(|r| r.get(on_conflict) == Some(&key));

        let stored = match existing {
            Some(index) => {
                if let Value::Object(columns) = &mut rows[index] {
                    for (column, value) in fields {
                        columns.insert(column, value);
                    }
                } else {
                    rows[index] = Value::Object(fields);
                }
                rows[index].clone()
            }
            None => {
                let row = Value::Object(fields);
                rows.push(row.clone());
                row
            }
        };

        Ok(vec![stored])
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, RemoteError> {
        self.check_available()?;

        let mut rows: Vec<Value> = {
            let tables = self
                .tables
                .read()
                .map_err(|_| RemoteError::Unavailable("Failed to acquire read lock".to_string()))?;
            tables
                .get(query.table())
                .map(|rows| {
                    rows.iter()
                        .filter(|row| {
                            query
                                .filters()
                                .iter()
                                .all(|(column, value)| row.get(column) == Some(value))
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some((column, direction)) = query.ordering() {
            rows.sort_by(|a, b| {
                let ordering = compare_cells(a.get(column), b.get(column));
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.max_rows() {
            rows.truncate(limit);
        }

        if query.columns().is_empty() {
            return Ok(rows);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let projected: Map<String, Value> = query
                    .columns()
                    .iter()
                    .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
                    .collect();
                Value::Object(projected)
            })
            .collect())
    }
}

/// Postgres-like ordering: NULL sorts above every value.
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (parse_timestamp(x), parse_timestamp(y)) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_key() {
        let client = InMemoryTableClient::new();

        client
            .upsert("game_saves", json!({"player_name": "alice", "chapter": 1}), "player_name")
            .await
            .unwrap();
        let stored = client
            .upsert("game_saves", json!({"player_name": "alice", "chapter": 2}), "player_name")
            .await
            .unwrap();

        assert_eq!(stored, vec![json!({"player_name": "alice", "chapter": 2})]);
        assert_eq!(client.rows("game_saves").len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_merges_columns() {
        let client = InMemoryTableClient::new();

        client
            .upsert("t", json!({"player_name": "a", "x": 1, "y": 1}), "player_name")
            .await
            .unwrap();
        client
            .upsert("t", json!({"player_name": "a", "y": 2}), "player_name")
            .await
            .unwrap();

        assert_eq!(client.rows("t"), vec![json!({"player_name": "a", "x": 1, "y": 2})]);
    }

    #[tokio::test]
    async fn test_upsert_requires_conflict_column() {
        let client = InMemoryTableClient::new();
        let result = client.upsert("t", json!({"chapter": 1}), "player_name").await;
        assert!(matches!(result, Err(RemoteError::Api { status: 400, .. })));
    }

    #[tokio::test]
    async fn test_select_filters_orders_and_limits() {
        let client = InMemoryTableClient::new();
        for (name, plays) in [("a", 3), ("b", 9), ("c", 1), ("d", 5)] {
            client
                .upsert(
                    "stats",
                    json!({"player_name": name, "total_plays": plays, "secret": true}),
                    "player_name",
                )
                .await
                .unwrap();
        }

        let query = Query::from_table("stats")
            .select(&["player_name", "total_plays"])
            .order("total_plays", Direction::Descending)
            .limit(2);
        let rows = client.select(&query).await.unwrap();

        assert_eq!(
            rows,
            vec![
                json!({"player_name": "b", "total_plays": 9}),
                json!({"player_name": "d", "total_plays": 5}),
            ]
        );

        let query = Query::from_table("stats").eq("player_name", "c");
        let rows = client.select(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["secret"], json!(true));
    }

    #[tokio::test]
    async fn test_select_unknown_table_is_empty() {
        let client = InMemoryTableClient::new();
        let rows = client.select(&Query::from_table("nothing")).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_timestamps_sort_chronologically() {
        let client = InMemoryTableClient::new();
        client
            .upsert("t", json!({"id": 1, "at": "2024-05-01T10:00:01Z"}), "id")
            .await
            .unwrap();
        client
            .upsert("t", json!({"id": 2, "at": "2024-05-01T10:00:01.500Z"}), "id")
            .await
            .unwrap();

        let query = Query::from_table("t").order("at", Direction::Descending).limit(1);
        let rows = client.select(&query).await.unwrap();
        assert_eq!(rows[0]["id"], json!(2));
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let client = InMemoryTableClient::new();
        client.set_unavailable(true);

        let upsert = client.upsert("t", json!({"id": 1}), "id").await;
        assert!(matches!(upsert, Err(RemoteError::Unavailable(_))));

        let select = client.select(&Query::from_table("t")).await;
        assert!(matches!(select, Err(RemoteError::Unavailable(_))));

        client.set_unavailable(false);
        assert!(client.upsert("t", json!({"id": 1}), "id").await.is_ok());
    }
}
