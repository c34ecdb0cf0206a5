//! blogpull - resumable image downloader for Blogspot blogs.
//!
//! Discovers post pages, extracts large CDN-hosted images, and downloads
//! them, checkpointing progress in a per-blog `blog.json` so interrupted
//! runs pick up where they left off.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use blogpull_core::shutdown_flag;

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "blogpull")]
#[command(about = "Resumable image downloader for Blogspot blogs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./blogpull.toml or ~/.config/blogpull/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three phases: discover posts, scan for images, download
    Run(cmd::run::RunArgs),
    /// Discover post pages and record them in the checkpoint
    Posts(cmd::posts::PostsArgs),
    /// Scan discovered posts for large images
    Assets(cmd::assets::AssetsArgs),
    /// Download checkpointed assets, skipping files already on disk
    Download(cmd::download::DownloadArgs),
    /// Show checkpoint progress for a blog
    Status(cmd::status::StatusArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(blogpull_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug (progress bars show activity)
    //   non-TTY: info unless --debug        (logs are the only progress indicator)
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    blogpull_core::init_logging(quiet, cli.debug, multi);

    setup_signal_handler();

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Run(args) => cmd::run::run(args, &config, &progress),
        Command::Posts(args) => cmd::posts::run(args, &config, &progress),
        Command::Assets(args) => cmd::assets::run(args, &config, &progress),
        Command::Download(args) => cmd::download::run(args, &config, &progress),
        Command::Status(args) => cmd::status::run(args, &config),
    }
}

fn setup_signal_handler() {
    // First signal: set graceful shutdown flag (phases stop between items).
    // Second signal: force exit.
    // SAFETY: AtomicBool::swap and process::exit are async-signal-safe
    unsafe {
        signal_hook::low_level::register(signal_hook::consts::SIGTERM, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("failed to register SIGTERM handler");
        signal_hook::low_level::register(signal_hook::consts::SIGINT, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("failed to register SIGINT handler");
    }
}
