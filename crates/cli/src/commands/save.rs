//! savegame save command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use savegame_core::SaveAdapter;
use savegame_shared::{GameState, PlayerName};

use super::print_outcome;

#[derive(Debug, Args)]
pub struct SaveCommand {
    /// Player name
    #[arg(short, long)]
    pub player: String,

    /// Game state as inline JSON
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub state: Option<String>,

    /// Read game state JSON from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl SaveCommand {
    pub async fn run(&self, adapter: &SaveAdapter, json: bool) -> anyhow::Result<()> {
        let raw = match (&self.state, &self.file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => anyhow::bail!("either --state or --file is required"),
        };

        let value: serde_json::Value =
            serde_json::from_str(&raw).context("Game state is not valid JSON")?;
        let state = GameState::new(value);
        if state.chapter().is_null() {
            tracing::warn!("Game state has no 'chapter' field");
        }

        let outcome = adapter
            .save_game(&PlayerName::new(self.player.as_str()), &state)
            .await?;
        print_outcome(&outcome, "Game", json)
    }
}
