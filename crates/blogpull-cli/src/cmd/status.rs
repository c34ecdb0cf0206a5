//! Status subcommand: checkpoint progress for a blog.

use anyhow::Result;
use clap::Args;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use blogpull_blogspot::Checkpoint;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: super::TargetArgs,
}

pub fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let (base_url, namespace_dir) = super::resolve_target(&args.target, config)?;

    if !Checkpoint::path_in(&namespace_dir).exists() {
        eprintln!("no checkpoint at {}, nothing fetched yet", namespace_dir.display());
        return Ok(());
    }
    let checkpoint = Checkpoint::load(&namespace_dir)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Blog").fg(Color::Cyan),
            Cell::new(&base_url).fg(Color::Cyan),
        ]);

    table.add_row(vec![
        "Output directory".to_string(),
        namespace_dir.display().to_string(),
    ]);
    table.add_row(vec![
        "Discovery completed".to_string(),
        checkpoint.completed.to_string(),
    ]);
    table.add_row(vec!["Posts".to_string(), checkpoint.posts.len().to_string()]);
    table.add_row(vec![
        "Posts scanned".to_string(),
        format!("{}/{}", checkpoint.scanned_posts(), checkpoint.posts.len()),
    ]);
    table.add_row(vec![
        "Assets".to_string(),
        checkpoint.total_assets().to_string(),
    ]);

    eprintln!("\n{table}");
    Ok(())
}
