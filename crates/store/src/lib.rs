//! # Savegame Store
//!
//! Storage backends behind the save adapter.
//!
//! ## Structure
//!
//! - `query` / `table` - Generic query builder and the remote table port
//! - `rest` - PostgREST implementation of the table port
//! - `in_memory` - In-process table, for tests and local development
//! - `local` - Key-value fallback store (files or memory)

pub mod in_memory;
pub mod local;
pub mod query;
pub mod rest;
pub mod table;

pub use in_memory::InMemoryTableClient;
pub use local::{FileLocalStore, InMemoryLocalStore, LocalStore};
pub use query::{Direction, Query};
pub use rest::RestTableClient;
pub use table::TableClient;
