//! CLI Commands

pub mod leaderboard;
pub mod load;
pub mod save;
pub mod stats;
pub mod status;

pub use leaderboard::LeaderboardCommand;
pub use load::LoadCommand;
pub use save::SaveCommand;
pub use stats::StatsCommand;
pub use status::StatusCommand;

use console::style;
use savegame_core::SaveOutcome;

/// Report how a write ended
pub(crate) fn print_outcome(outcome: &SaveOutcome, what: &str, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match outcome {
        SaveOutcome::Saved { .. } => {
            println!("{} {} saved remotely", style("✓").green(), what);
        }
        SaveOutcome::Offline => {
            println!("{} {} saved locally (offline mode)", style("✓").green(), what);
        }
        SaveOutcome::Fallback { error } => {
            println!("{} Remote write failed: {}", style("✗").red(), error);
            println!("  {} saved locally instead", what);
        }
    }
    Ok(())
}
