//! Download subcommand: fetch checkpointed assets alone.

use anyhow::{Context, Result};
use clap::Args;

use blogpull_core::{Client, SharedProgress};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub target: super::TargetArgs,
}

pub fn run(args: DownloadArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let pipeline = super::build_pipeline_config(&args.target, config)?;
    let client = Client::new(&pipeline.http).context("failed to build HTTP client")?;
    let stats = blogpull_blogspot::download::run(&pipeline, &client, progress)?;
    log::info!(
        "{} downloaded, {} already present, {} failed",
        stats.downloaded,
        stats.skipped,
        stats.failed
    );
    Ok(())
}
