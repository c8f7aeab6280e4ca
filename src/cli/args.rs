use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lighthouse_aggregator::AggregatorConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the queue state file (overrides the config file)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Enable debug logging for internal details
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Append a job to the end of the queue
    Enqueue(JobArgs),
    /// Remove the first job matching both identifiers
    Dequeue(JobArgs),
    /// Print the queued jobs in processing order
    List,
    /// Print the state file location
    Path,
    /// Drop every queued job
    Clear,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct JobArgs {
    /// Content identifier
    pub cid: String,

    /// Transaction identifier
    #[arg(value_name = "TXID")]
    pub tx_id: String,
}

impl Cli {
    /// Resolve configuration: defaults, then the config file, then `--state`
    pub fn resolve_config(&self) -> Result<AggregatorConfig> {
        let mut config = match &self.config {
            Some(path) => AggregatorConfig::from_file(path)?,
            None => AggregatorConfig::default(),
        };
        if let Some(state) = &self.state {
            config.state_path = state.clone();
        }
        Ok(config)
    }
}
