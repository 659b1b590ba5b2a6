//! Memefier CLI - AI meme caption generation from the command line.
//!
//! Memefier uploads an image to the caption pipeline service and prints the
//! captions it comes back with. It also exposes the site's vote and taste
//! statistics logic for offline use.
//!
//! # Usage
//!
//! ```bash
//! # Caption an image
//! memefier caption cat.png
//!
//! # Taste statistics from an exported vote history
//! memefier stats votes.json --timeline
//!
//! # View configuration
//! memefier config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Memefier - AI meme caption generation.
#[derive(Parser, Debug)]
#[command(name = "memefier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate meme captions for an image
    Caption(cli::caption::CaptionArgs),

    /// Summarize a vote history
    Stats(cli::stats::StatsArgs),

    /// Show what a vote does to an existing one
    Vote(cli::vote::VoteArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match memefier_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `memefier config path`."
            );
            memefier_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Memefier v{}", memefier_core::VERSION);

    match cli.command {
        Commands::Caption(args) => cli::caption::execute(args, config).await,
        Commands::Stats(args) => cli::stats::execute(args, &config),
        Commands::Vote(args) => cli::vote::execute(args),
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
