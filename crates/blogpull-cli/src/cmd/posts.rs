//! Posts subcommand: run post discovery alone.

use anyhow::{Context, Result};
use clap::Args;

use blogpull_core::{Client, SharedProgress};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct PostsArgs {
    #[command(flatten)]
    pub target: super::TargetArgs,
}

pub fn run(args: PostsArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let pipeline = super::build_pipeline_config(&args.target, config)?;
    let client = Client::new(&pipeline.http).context("failed to build HTTP client")?;
    let found = blogpull_blogspot::discover::run(&pipeline, &client, progress)?;
    log::info!("{found} new posts");
    Ok(())
}
