//! The `memefier stats` command.

use anyhow::Context;
use clap::Args;
use memefier_core::site::stats::timezone;
use memefier_core::site::{group_by_day, load_votes, DayGroup, TasteStats, VoteRecord};
use memefier_core::Config;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Arguments for the `stats` command.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// JSON file holding an array of vote records, newest first
    #[arg(required = true)]
    pub votes: PathBuf,

    /// Also print votes grouped by day
    #[arg(long)]
    pub timeline: bool,
}

#[derive(Serialize)]
struct StatsReport {
    stats: TasteStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeline: Option<Vec<DayGroup>>,
}

/// Execute the stats command.
pub fn execute(args: StatsArgs, config: &Config) -> anyhow::Result<()> {
    let votes = read_votes(&args.votes)?;
    tracing::debug!("Loaded {} votes from {}", votes.len(), args.votes.display());

    let report = build_report(&votes, config, args.timeline);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_votes(path: &Path) -> anyhow::Result<Vec<VoteRecord>> {
    load_votes(path).with_context(|| format!("Failed to load votes from {}", path.display()))
}

fn build_report(votes: &[VoteRecord], config: &Config, timeline: bool) -> StatsReport {
    StatsReport {
        stats: TasteStats::from_votes(votes, &config.stats),
        timeline: timeline.then(|| group_by_day(votes, &timezone(&config.stats))),
    }
}
