//! Assets subcommand: run asset discovery alone.

use anyhow::{Context, Result};
use clap::Args;

use blogpull_core::{Client, SharedProgress};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct AssetsArgs {
    #[command(flatten)]
    pub target: super::TargetArgs,
}

pub fn run(args: AssetsArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let pipeline = super::build_pipeline_config(&args.target, config)?;
    let client = Client::new(&pipeline.http).context("failed to build HTTP client")?;
    let scanned = blogpull_blogspot::assets::run(&pipeline, &client, progress)?;
    log::info!("{scanned} posts scanned");
    Ok(())
}
