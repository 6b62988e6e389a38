//! Deckhand CLI - command-line interface for the deploy engine
//!
//! Provides commands for:
//! - Viewing pending workspace changes
//! - Running deploy attempts with interactive conflict resolution
//! - Publishing binary assets and their manifest entries
//! - Viewing and validating configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod prompt;

use commands::{
    config::ConfigCommand, deploy::DeployCommand, push_assets::PushAssetsCommand,
    status::StatusCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "deckhand", version, about = "Hot/cold workspace deploy engine")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show pending changes without contacting the remote
    Status(StatusCommand),
    /// Run a deploy attempt
    Deploy(DeployCommand),
    /// Publish binary assets and register them in the manifest
    PushAssets(PushAssetsCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Status(cmd) => cmd.execute(format, cli.config.as_deref()).await,
        Commands::Deploy(cmd) => cmd.execute(format, cli.config.as_deref()).await,
        Commands::PushAssets(cmd) => cmd.execute(format, cli.config.as_deref()).await,
        Commands::Config(cmd) => cmd.execute(format, cli.config.as_deref()).await,
    }
}
