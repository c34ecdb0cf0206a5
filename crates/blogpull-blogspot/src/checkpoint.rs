//! Durable pipeline state: the single `blog.json` every phase
//! reads, mutates, and writes back.
//!
//! Loading is deliberately lenient: a missing file yields a fresh empty
//! checkpoint (persisted immediately), and a malformed or partial file
//! decodes best-effort with absent fields defaulting; a half-written
//! checkpoint must never brick a restart.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use blogpull_core::write_atomic;

pub const CHECKPOINT_FILENAME: &str = "blog.json";

/// One discovered blog post. Identity is the normalized URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    /// Unused by the pipeline but part of the wire format.
    pub title: String,
    /// Per-post asset directory, derived from the URL path.
    pub namespace: String,
    pub url: String,
    /// True once asset discovery has processed this post.
    pub is_pending_completed: bool,
    /// Filtered asset URLs, append-only once populated.
    pub assets: Vec<String>,
}

impl Post {
    pub fn new(url: String, namespace: String) -> Self {
        Self {
            url,
            namespace,
            ..Default::default()
        }
    }
}

/// Checkpoint for one blog run. Insertion order of `posts` is
/// discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checkpoint {
    /// Root output directory this checkpoint belongs to.
    pub namespace: String,
    /// True once post discovery has finished; discovery is then skipped.
    pub completed: bool,
    pub posts: Vec<Post>,
}

impl Checkpoint {
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CHECKPOINT_FILENAME)
    }

    /// Load the checkpoint from `dir`, which must already exist.
    ///
    /// Absent file: an empty checkpoint is written to disk and returned.
    /// Unreadable JSON: logged, empty checkpoint returned (not persisted,
    /// so the broken file survives for inspection until the next save).
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        if !path.exists() {
            let checkpoint = Self {
                namespace: dir.display().to_string(),
                ..Default::default()
            };
            checkpoint.save(dir)?;
            return Ok(checkpoint);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match serde_json::from_str(&raw) {
            Ok(checkpoint) => Ok(checkpoint),
            Err(e) => {
                log::warn!(
                    "{}: unreadable checkpoint ({e}), resuming from empty state",
                    path.display()
                );
                Ok(Self {
                    namespace: dir.display().to_string(),
                    ..Default::default()
                })
            }
        }
    }

    /// Persist as indented JSON via tmp-file + rename.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = Self::path_in(dir);
        let json = serde_json::to_string_pretty(self).context("failed to serialize checkpoint")?;
        write_atomic(&path, json.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Posts that asset discovery has already processed.
    pub fn scanned_posts(&self) -> usize {
        self.posts.iter().filter(|p| p.is_pending_completed).count()
    }

    pub fn total_assets(&self) -> usize {
        self.posts.iter().map(|p| p.assets.len()).sum()
    }
}
