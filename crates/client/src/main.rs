//! Arena client binary.
//!
//! Composition root for headless sessions: loads `.env`, sets up logging,
//! opens the data directory and dispatches one command.
//!
//! ```bash
//! # Three rounds between the two stored scripts
//! cargo run -p arena-client -- run --player1 custom-a --player2 custom-b
//!
//! # Validate a script before importing it
//! cargo run -p arena-client -- check my_fighter.js
//! ```

mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Export, Import, Run};
use config::ClientConfig;

/// Scripted arena fights from the command line
#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Scripted arena fighter", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory (default: ARENA_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a headless session
    Run(Run),

    /// Analyze and compile a script file
    Check(Check),

    /// Export a slot's script
    Export(Export),

    /// Import a script into a slot
    Import(Import),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    logging::setup_logging(config.session_id.as_deref())?;
    tracing::info!("Data directory: {}", config.data_dir.display());

    match cli.command {
        Command::Run(cmd) => cmd.execute(&config.data_dir).await,
        Command::Check(cmd) => cmd.execute(),
        Command::Export(cmd) => cmd.execute(&config.data_dir),
        Command::Import(cmd) => cmd.execute(&config.data_dir).await,
    }
}
