//! Asset discovery: scan each unprocessed post page for large
//! CDN-hosted images and record them in the checkpoint.
//!
//! One post processed = one checkpoint write, so an interrupted run
//! resumes with every finished post intact and at most one post left
//! unmarked.

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;

use blogpull_core::{is_shutdown_requested, Client, SharedProgress};

use crate::checkpoint::Checkpoint;
use crate::config::Config;
use crate::{filters, page};

/// Extract the filtered asset list for one post page.
///
/// Candidates already present in `existing` are not re-added (append-only
/// assets across repeated runs). Dedup happens before the size filter, as
/// does host filtering: only confidently-large CDN images survive.
pub fn extract_assets(html: &str, existing: &[String], min_width: u32) -> Vec<String> {
    let mut seen: FxHashSet<String> = existing.iter().cloned().collect();
    let mut raw = Vec::new();
    for candidate in page::image_candidates(html) {
        let candidate = filters::normalize_scheme(&candidate);
        if filters::is_asset_url(&candidate) && seen.insert(candidate.clone()) {
            raw.push(candidate);
        }
    }
    raw.retain(|candidate| filters::meets_min_width(candidate, min_width));
    raw
}

/// Process every post not yet marked complete. Returns how many posts
/// were scanned this run.
///
/// A fetch failure skips the post (left incomplete for the next run); a
/// checkpoint write failure is fatal since it breaks resumability.
pub fn run(config: &Config, client: &Client, progress: &SharedProgress) -> Result<usize> {
    let mut checkpoint = Checkpoint::load(&config.namespace_dir)?;
    let total = checkpoint.posts.len();
    let pb = progress.count_bar("assets", total as u64);
    let mut scanned = 0usize;

    for i in 0..total {
        pb.inc(1);
        if is_shutdown_requested() {
            log::warn!("shutdown requested, stopping asset discovery (resumes next run)");
            break;
        }
        if checkpoint.posts[i].is_pending_completed {
            log::debug!("skipping: {}", checkpoint.posts[i].url);
            continue;
        }

        let post_url = checkpoint.posts[i].url.clone();
        pb.set_message(post_url.clone());
        let html = match client.fetch_text(&post_url) {
            Ok(html) => html,
            Err(e) => {
                log::warn!("{post_url}: {e}, leaving post for next run");
                continue;
            }
        };

        let found = extract_assets(&html, &checkpoint.posts[i].assets, config.min_width);
        log::info!(
            "{post_url}: {} assets ({} posts remaining)",
            found.len(),
            total - i - 1
        );

        let post = &mut checkpoint.posts[i];
        post.assets.extend(found);
        post.is_pending_completed = true;
        checkpoint
            .save(&config.namespace_dir)
            .context("checkpoint write failed during asset discovery")?;
        scanned += 1;
    }

    pb.finish_and_clear();
    Ok(scanned)
}
