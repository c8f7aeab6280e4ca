mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{run_command, Cli};
use lighthouse_aggregator::StateStorage;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments first to get debug flag
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = cli.resolve_config()?;
    debug!("Using queue state file: {}", config.state_path.display());

    let storage = StateStorage::from_config(&config);
    run_command(&cli.command, &storage).await
}
