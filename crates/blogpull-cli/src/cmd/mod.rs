//! Subcommand implementations and the flag-to-pipeline-config glue.

pub mod assets;
pub mod download;
pub mod posts;
pub mod run;
pub mod status;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use url::Url;

use crate::config::Config as FileConfig;

/// Flags shared by every phase command.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Blog URL (falls back to the URL environment variable)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Output directory for downloaded files
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,

    /// Parallel download workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Minimum embedded width for kept images
    #[arg(long)]
    pub min_width: Option<u32>,
}

/// Directory name for a blog: the URL host with `www.` removed.
pub fn blog_dir_name(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url).with_context(|| format!("invalid blog URL: {base_url}"))?;
    let host = url
        .host_str()
        .with_context(|| format!("blog URL has no host: {base_url}"))?;
    Ok(host.replace("www.", ""))
}

/// Resolve the blog URL and its namespace directory from flags, the URL
/// environment variable, and the config file. Does not touch the disk.
pub fn resolve_target(args: &TargetArgs, file: &FileConfig) -> Result<(String, PathBuf)> {
    let base_url = args
        .url
        .clone()
        .or_else(|| std::env::var("URL").ok())
        .context("please provide a blog URL (--url or the URL environment variable)")?;
    let out_root = args
        .outdir
        .clone()
        .unwrap_or_else(|| file.output.default_dir.clone());
    let namespace_dir = out_root.join(blog_dir_name(&base_url)?);
    Ok((base_url, namespace_dir))
}

/// Build the pipeline config, creating the blog's namespace directory.
pub fn build_pipeline_config(
    args: &TargetArgs,
    file: &FileConfig,
) -> Result<blogpull_blogspot::Config> {
    let (base_url, namespace_dir) = resolve_target(args, file)?;
    std::fs::create_dir_all(&namespace_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            namespace_dir.display()
        )
    })?;

    let workers = args
        .workers
        .unwrap_or(file.workers.default)
        .clamp(1, file.workers.max);

    Ok(blogpull_blogspot::Config {
        base_url,
        namespace_dir,
        min_width: args.min_width.unwrap_or(file.filter.min_width),
        workers,
        http: blogpull_core::HttpSettings {
            user_agent: file.http.user_agent.clone(),
            connect_timeout: Duration::from_secs(file.http.connect_timeout),
            read_timeout: Duration::from_secs(file.http.read_timeout),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_name_strips_www() {
        assert_eq!(
            blog_dir_name("https://www.example.blogspot.com/").unwrap(),
            "example.blogspot.com"
        );
        assert_eq!(
            blog_dir_name("https://example.blogspot.com/").unwrap(),
            "example.blogspot.com"
        );
    }

    #[test]
    fn dir_name_rejects_invalid_url() {
        assert!(blog_dir_name("not a url").is_err());
    }

    #[test]
    fn resolve_target_joins_host_under_outdir() {
        let args = TargetArgs {
            url: Some("https://www.example.blogspot.com/".into()),
            outdir: Some(PathBuf::from("/tmp/out")),
            workers: None,
            min_width: None,
        };
        let (base_url, dir) = resolve_target(&args, &FileConfig::default()).unwrap();
        assert_eq!(base_url, "https://www.example.blogspot.com/");
        assert_eq!(dir, PathBuf::from("/tmp/out/example.blogspot.com"));
    }

    #[test]
    fn build_creates_namespace_dir_and_clamps_workers() {
        let tmp = tempfile::tempdir().unwrap();
        let args = TargetArgs {
            url: Some("https://example.blogspot.com/".into()),
            outdir: Some(tmp.path().to_path_buf()),
            workers: Some(99),
            min_width: Some(800),
        };
        let config = build_pipeline_config(&args, &FileConfig::default()).unwrap();
        assert!(config.namespace_dir.is_dir());
        assert_eq!(config.workers, FileConfig::default().workers.max);
        assert_eq!(config.min_width, 800);
    }
}
