//! # Savegame Core
//!
//! The `SaveAdapter`: saves and loads a player's game state and statistics
//! to a remote table store, with a local key-value fallback.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  SaveAdapter                                               │
//! │    ├── offline? ──yes──► LocalStore (gameSave / gameStats) │
//! │    └── no ──► TableClient (game_saves / game_statistics)   │
//! │                 └── on failure ──► LocalStore              │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod outcome;
pub mod save_adapter;

pub use outcome::SaveOutcome;
pub use save_adapter::{SaveAdapter, DEFAULT_LEADERBOARD_LIMIT};
