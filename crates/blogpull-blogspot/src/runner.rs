//! Runs the three pipeline phases in order against one checkpoint.
//!
//! Each phase loads the checkpoint fresh, mutates it, and persists it
//! before the next phase starts; there is no overlap.

use std::time::Instant;

use anyhow::{Context, Result};

use blogpull_core::{is_shutdown_requested, Client, SharedProgress};

use crate::config::Config;
use crate::download::DownloadStats;
use crate::{assets, discover, download};

/// Pipeline execution summary.
#[derive(Debug)]
pub struct Summary {
    pub new_posts: usize,
    pub posts_scanned: usize,
    pub downloads: DownloadStats,
    pub elapsed: std::time::Duration,
}

impl Summary {
    pub fn log(&self) {
        log::info!("=== blogpull summary ===");
        log::info!("posts: {} new", self.new_posts);
        log::info!("scanned: {} post pages", self.posts_scanned);
        log::info!(
            "files: {} downloaded, {} already present, {} failed",
            self.downloads.downloaded,
            self.downloads.skipped,
            self.downloads.failed
        );
        log::info!("time: {:.1}s", self.elapsed.as_secs_f64());
    }
}

/// Run discovery, asset extraction, and download back to back.
///
/// Stops between phases when shutdown is requested; the checkpoint's
/// incremental writes make the partial run resumable.
pub fn run(config: &Config, progress: &SharedProgress) -> Result<Summary> {
    anyhow::ensure!(!config.base_url.is_empty(), "no blog URL configured");
    anyhow::ensure!(
        config.namespace_dir.is_dir(),
        "output directory {} does not exist",
        config.namespace_dir.display()
    );

    let start = Instant::now();
    let client = Client::new(&config.http).context("failed to build HTTP client")?;

    let mut summary = Summary {
        new_posts: 0,
        posts_scanned: 0,
        downloads: DownloadStats::default(),
        elapsed: Default::default(),
    };

    summary.new_posts = discover::run(config, &client, progress)?;
    if is_shutdown_requested() {
        summary.elapsed = start.elapsed();
        summary.log();
        return Ok(summary);
    }

    summary.posts_scanned = assets::run(config, &client, progress)?;
    if is_shutdown_requested() {
        summary.elapsed = start.elapsed();
        summary.log();
        return Ok(summary);
    }

    summary.downloads = download::run(config, &client, progress)?;
    summary.elapsed = start.elapsed();
    summary.log();
    Ok(summary)
}
