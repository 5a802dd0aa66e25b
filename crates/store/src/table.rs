//! Remote table port
//!
//! The adapter only needs two primitives from the backend: an upsert with a
//! conflict target, and a select. How they reach the table is the
//! implementation's business.
//!
//! ```text
//! Adapter               │  Implementations
//! ──────────────────────┼────────────────────────
//! trait TableClient     │  RestTableClient
//!   upsert()            │  InMemoryTableClient
//!   select()            │
//! ```

use async_trait::async_trait;
use savegame_shared::RemoteError;
use serde_json::Value;

use crate::query::Query;

/// Generic table client.
///
/// Object safe, so the adapter can hold an `Arc<dyn TableClient>`.
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Insert `row`, or update the existing row whose `on_conflict` column
    /// matches. Exactly one row per conflict key exists afterwards.
    ///
    /// Returns the stored row(s).
    async fn upsert(
        &self,
        table: &str,
        row: Value,
        on_conflict: &str,
    ) -> Result<Vec<Value>, RemoteError>;

    /// Run a select. Zero rows is not an error.
    async fn select(&self, query: &Query) -> Result<Vec<Value>, RemoteError>;
}
