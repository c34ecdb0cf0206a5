//! Asset download with on-disk idempotency.
//!
//! Files are keyed by position: asset `i` of a post lands at
//! `{namespace_dir}/{post namespace}/{i}.{ext}`. An existing file is
//! skipped without issuing a request, so re-running the phase is a no-op
//! for completed downloads. Bodies stream to a `.tmp` sibling and rename
//! into place, so a truncated download never masquerades as complete.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rayon::prelude::*;

use blogpull_core::{
    cleanup_tmp_files, is_shutdown_requested, tmp_path, Client, DownloadError, SharedProgress,
};

use crate::checkpoint::{Checkpoint, Post};
use crate::config::Config;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Target filename for the asset at `index`: `{index}.{ext}`, extension
/// taken from the URL path (`bin` when the path has none).
pub fn asset_filename(index: usize, asset_url: &str) -> String {
    let ext = url::Url::parse(asset_url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
        })
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| String::from("bin"));
    format!("{index}.{ext}")
}

/// Asset directory for a post. Post namespaces are URL paths with a
/// leading slash; joined relative so they stay inside the root.
pub fn post_dir(root: &Path, namespace: &str) -> PathBuf {
    root.join(namespace.trim_start_matches('/'))
}

/// Download every checkpointed asset that is not yet on disk.
///
/// Posts are handed to a bounded worker pool; the checkpoint is never
/// mutated here. A request-level error aborts the whole phase, a
/// body-copy error only forfeits that file until the next run.
pub fn run(config: &Config, client: &Client, progress: &SharedProgress) -> Result<DownloadStats> {
    let checkpoint = Checkpoint::load(&config.namespace_dir)?;
    cleanup_tmp_files(&config.namespace_dir).context("failed to clean stale tmp files")?;

    let total_assets = checkpoint.total_assets();
    let pb = progress.count_bar("download", total_assets as u64);
    log::info!(
        "downloading {} assets across {} posts with {} workers",
        total_assets,
        checkpoint.posts.len(),
        config.workers.max(1)
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build()
        .context("failed to create download pool")?;

    let downloaded = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let abort = AtomicBool::new(false);
    let fatal: Mutex<Option<anyhow::Error>> = Mutex::new(None);

    pool.install(|| {
        checkpoint.posts.par_iter().for_each(|post| {
            if abort.load(Ordering::Relaxed) {
                return;
            }
            let counters = Counters {
                downloaded: &downloaded,
                skipped: &skipped,
                failed: &failed,
            };
            if let Err(e) = download_post(config, client, post, &pb, &abort, &counters) {
                abort.store(true, Ordering::Relaxed);
                let mut slot = fatal.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if slot.is_none() {
                    *slot = Some(e);
                }
            }
        });
    });

    pb.finish_and_clear();
    if let Some(e) = fatal
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
    {
        return Err(e);
    }
    if is_shutdown_requested() {
        log::warn!("shutdown requested, download phase stopped early");
    }
    Ok(DownloadStats {
        downloaded: downloaded.load(Ordering::Relaxed),
        skipped: skipped.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    })
}

struct Counters<'a> {
    downloaded: &'a AtomicUsize,
    skipped: &'a AtomicUsize,
    failed: &'a AtomicUsize,
}

fn download_post(
    config: &Config,
    client: &Client,
    post: &Post,
    pb: &ProgressBar,
    abort: &AtomicBool,
    counters: &Counters<'_>,
) -> Result<()> {
    let dir = post_dir(&config.namespace_dir, &post.namespace);
    for (index, asset) in post.assets.iter().enumerate() {
        if is_shutdown_requested() || abort.load(Ordering::Relaxed) {
            return Ok(());
        }

        let target = dir.join(asset_filename(index, asset));
        if target.exists() {
            counters.skipped.fetch_add(1, Ordering::Relaxed);
            pb.inc(1);
            continue;
        }

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let tmp = tmp_path(&target);
        pb.set_message(asset.clone());
        match client.download_to_file(asset, &tmp) {
            Ok(bytes) => {
                std::fs::rename(&tmp, &target)
                    .with_context(|| format!("failed to finalize {}", target.display()))?;
                log::info!("downloaded: {} ({bytes} bytes)", target.display());
                counters.downloaded.fetch_add(1, Ordering::Relaxed);
            }
            Err(DownloadError::Body(e)) => {
                log::warn!("{asset}: {e}, leaving for next run");
                let _ = std::fs::remove_file(&tmp);
                counters.failed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e @ DownloadError::Request(_)) => {
                let _ = std::fs::remove_file(&tmp);
                return Err(anyhow::Error::new(e))
                    .with_context(|| format!("failed to download {asset}"));
            }
        }
        pb.inc(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_url_extension() {
        assert_eq!(
            asset_filename(0, "http://1.bp.blogspot.com/a/s1600/photo.jpg"),
            "0.jpg"
        );
        assert_eq!(
            asset_filename(12, "https://blogger.googleusercontent.com/x/s1600/img.png"),
            "12.png"
        );
    }

    #[test]
    fn filename_falls_back_without_extension() {
        assert_eq!(
            asset_filename(3, "https://blogger.googleusercontent.com/img/a/s1600/noext"),
            "3.bin"
        );
        assert_eq!(asset_filename(0, "not a url"), "0.bin");
    }

    #[test]
    fn filename_ignores_query_noise() {
        assert_eq!(
            asset_filename(1, "http://1.bp.blogspot.com/a/s1600/p.jpg?cache=1"),
            "1.jpg"
        );
    }

    #[test]
    fn post_dir_keeps_namespace_relative() {
        let dir = post_dir(Path::new("public/example.blogspot.com"), "/2021/05/first");
        assert_eq!(
            dir,
            PathBuf::from("public/example.blogspot.com/2021/05/first")
        );
    }
}
