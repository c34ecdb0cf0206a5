//! blogpull blogspot - resumable image pipeline for Blogspot blogs.
//!
//! Three sequential phases, all checkpointed in one `blog.json`:
//!
//! 1. [`discover`]: crawl the blog for post pages
//! 2. [`assets`]: scan each post for large CDN-hosted images
//! 3. [`download`]: fetch assets, skipping files already on disk
//!
//! Any phase can be interrupted and resumed: the checkpoint is persisted
//! after every new post, every scanned page, and downloads are keyed by
//! on-disk presence.
//!
//! # Example
//!
//! ```ignore
//! use blogpull_blogspot::{run, Config};
//!
//! let config = Config {
//!     base_url: "https://example.blogspot.com/".into(),
//!     namespace_dir: "public/example.blogspot.com".into(),
//!     ..Default::default()
//! };
//! let summary = run(&config, &progress)?;
//! ```

pub mod assets;
pub mod checkpoint;
pub mod config;
pub mod discover;
pub mod download;
pub mod filters;
pub mod page;
pub mod runner;

// Re-exports
pub use checkpoint::{Checkpoint, Post, CHECKPOINT_FILENAME};
pub use config::Config;
pub use download::DownloadStats;
pub use runner::{run, Summary};
