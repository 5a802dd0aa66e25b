//! savegame stats command

use anyhow::Context;
use clap::Args;
use savegame_core::SaveAdapter;
use savegame_shared::{PlayerName, StatsUpdate};
use serde_json::{Map, Value};

use super::print_outcome;

#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Player name
    #[arg(short, long)]
    pub player: String,

    /// Total number of plays
    #[arg(long)]
    pub total_plays: Option<u64>,

    /// Ending reached (repeatable)
    #[arg(long = "ending")]
    pub endings: Vec<String>,

    /// Achievement unlocked (repeatable)
    #[arg(long = "achievement")]
    pub achievements: Vec<String>,

    /// Best stats as a JSON object, e.g. '{"score": 1200}'
    #[arg(long)]
    pub best: Option<String>,
}

impl StatsCommand {
    /// Only the flags actually given end up in the update
    pub fn to_update(&self) -> anyhow::Result<StatsUpdate> {
        let mut update = StatsUpdate::new();
        update.total_plays = self.total_plays;

        for ending in &self.endings {
            update = update.with_ending(ending.as_str());
        }
        for achievement in &self.achievements {
            update = update.with_achievement(achievement.as_str());
        }

        if let Some(raw) = &self.best {
            let best: Map<String, Value> =
                serde_json::from_str(raw).context("--best must be a JSON object")?;
            update.best_stats = Some(best);
        }

        Ok(update)
    }

    pub async fn run(&self, adapter: &SaveAdapter, json: bool) -> anyhow::Result<()> {
        let update = self.to_update()?;
        let outcome = adapter
            .update_statistics(&PlayerName::new(self.player.as_str()), &update)
            .await?;
        print_outcome(&outcome, "Statistics", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command() -> StatsCommand {
        StatsCommand {
            player: "alice".to_string(),
            total_plays: None,
            endings: vec![],
            achievements: vec![],
            best: None,
        }
    }

    #[test]
    fn test_only_given_flags_are_set() {
        let mut cmd = command();
        cmd.total_plays = Some(3);

        let update = cmd.to_update().unwrap();
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"totalPlays": 3}));
    }

    #[test]
    fn test_repeated_flags_and_best() {
        let mut cmd = command();
        cmd.endings = vec!["good".to_string(), "bad".to_string()];
        cmd.achievements = vec!["speedrun".to_string()];
        cmd.best = Some(r#"{"score": 1200}"#.to_string());

        let update = cmd.to_update().unwrap();
        assert_eq!(update.endings_reached.unwrap(), vec!["good", "bad"]);
        assert_eq!(update.achievements.unwrap(), vec!["speedrun"]);
        assert_eq!(update.best_stats.unwrap()["score"], json!(1200));
    }

    #[test]
    fn test_best_must_be_object() {
        let mut cmd = command();
        cmd.best = Some("[1, 2]".to_string());
        assert!(cmd.to_update().is_err());
    }
}
