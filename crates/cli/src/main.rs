//! savegame - Command-line access to the save adapter
//!
//! Usage:
//!   savegame save --player <name> --state <json>   - Save game state
//!   savegame load --player <name>                  - Load game state
//!   savegame stats --player <name> [...]           - Update statistics
//!   savegame leaderboard [--limit N]               - Show top players
//!   savegame status                                - Show online/offline mode
//!
//! Remote credentials come from `SUPABASE_URL` / `SUPABASE_ANON_KEY`, or
//! from a JSON file given with `--config`.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{LeaderboardCommand, LoadCommand, SaveCommand, StatsCommand, StatusCommand};
use savegame_core::SaveAdapter;
use savegame_shared::AdapterConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "savegame")]
#[command(about = "Save and load game progress, with a local fallback when offline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from a JSON file instead of the environment
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of the local fallback store
    #[arg(long, global = true)]
    local_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a player's game state
    Save(SaveCommand),
    /// Load a player's game state
    Load(LoadCommand),
    /// Update a player's statistics
    Stats(StatsCommand),
    /// Show the top players by total plays
    Leaderboard(LeaderboardCommand),
    /// Show whether the adapter is online
    Status(StatusCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AdapterConfig::from_file(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?,
        None => AdapterConfig::from_env()?,
    };
    if let Some(dir) = cli.local_dir {
        config.local_dir = dir;
    }

    let adapter = SaveAdapter::new(&config)?;

    match cli.command {
        Commands::Save(cmd) => cmd.run(&adapter, cli.json).await,
        Commands::Load(cmd) => cmd.run(&adapter, cli.json).await,
        Commands::Stats(cmd) => cmd.run(&adapter, cli.json).await,
        Commands::Leaderboard(cmd) => cmd.run(&adapter, cli.json).await,
        Commands::Status(cmd) => cmd.run(&adapter, &config, cli.json),
    }
}
