//! savegame leaderboard command

use clap::Args;
use console::style;
use savegame_core::{SaveAdapter, DEFAULT_LEADERBOARD_LIMIT};

#[derive(Debug, Args)]
pub struct LeaderboardCommand {
    /// Number of players to show
    #[arg(short, long, default_value_t = DEFAULT_LEADERBOARD_LIMIT)]
    pub limit: usize,
}

impl LeaderboardCommand {
    pub async fn run(&self, adapter: &SaveAdapter, json: bool) -> anyhow::Result<()> {
        let entries = adapter.get_leaderboard(self.limit).await;

        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        if entries.is_empty() {
            println!("No leaderboard entries");
            return Ok(());
        }

        let header = format!(
            "{:>4}  {:<24} {:>6} {:>8} {:>12}",
            "#", "Player", "Plays", "Endings", "Achievements"
        );
        println!("{}", style(header).bold());
        for (rank, entry) in entries.iter().enumerate() {
            println!(
                "{:>4}  {:<24} {:>6} {:>8} {:>12}",
                rank + 1,
                entry.player_name,
                entry.total_plays,
                entry.endings_reached.len(),
                entry.achievements.len()
            );
        }
        Ok(())
    }
}
