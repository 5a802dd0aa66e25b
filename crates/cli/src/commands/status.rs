//! savegame status command

use clap::Args;
use console::style;
use savegame_core::SaveAdapter;
use savegame_shared::AdapterConfig;

#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub fn run(
        &self,
        adapter: &SaveAdapter,
        config: &AdapterConfig,
        json: bool,
    ) -> anyhow::Result<()> {
        let remote_url = config.remote.as_ref().map(|r| r.url.as_str());

        if json {
            let status = serde_json::json!({
                "offline": adapter.is_offline(),
                "remoteUrl": remote_url,
                "localDir": config.local_dir,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        match remote_url {
            Some(url) if !adapter.is_offline() => {
                println!("Mode:      {}", style("online").green());
                println!("Remote:    {}", url);
            }
            _ => println!("Mode:      {}", style("offline").yellow()),
        }
        println!("Local dir: {}", config.local_dir.display());
        Ok(())
    }
}
