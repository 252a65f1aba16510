use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Task board client for the parish administration project tracker.
/// Configuration defaults to ~/.taskboard/config.toml or a path passed via --config.
#[derive(Parser)]
#[command(name = "tb", version, about = "Project task board and CLI")]
pub struct Cli {
    /// Path to the client config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Context to use instead of the current one.
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}
