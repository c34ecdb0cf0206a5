//! Run subcommand: all three phases back to back.

use anyhow::Result;
use clap::Args;

use blogpull_core::SharedProgress;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: super::TargetArgs,
}

pub fn run(args: RunArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let pipeline = super::build_pipeline_config(&args.target, config)?;
    blogpull_blogspot::run(&pipeline, progress)?;
    Ok(())
}
