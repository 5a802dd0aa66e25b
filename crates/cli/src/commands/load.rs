//! savegame load command

use clap::Args;
use console::style;
use savegame_core::SaveAdapter;
use savegame_shared::PlayerName;

#[derive(Debug, Args)]
pub struct LoadCommand {
    /// Player name
    #[arg(short, long)]
    pub player: String,
}

impl LoadCommand {
    pub async fn run(&self, adapter: &SaveAdapter, json: bool) -> anyhow::Result<()> {
        let player = PlayerName::new(self.player.as_str());
        let state = adapter.load_game(&player).await?;

        match state {
            Some(state) => {
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
            None if json => println!("null"),
            None => println!("{} No save found for {}", style("✗").yellow(), player),
        }
        Ok(())
    }
}
