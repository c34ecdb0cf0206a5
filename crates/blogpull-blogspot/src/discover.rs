//! Post discovery: breadth-first-by-link-order crawl from the blog root.
//!
//! Every accepted post link is persisted to the checkpoint as soon as it
//! is found (write-through), so a crash loses at most the in-flight
//! page's discoveries. Once the crawl drains cleanly the checkpoint's
//! `completed` flag is set and later runs skip this phase entirely.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;

use blogpull_core::{is_shutdown_requested, Client, SharedProgress};

use crate::checkpoint::{Checkpoint, Post};
use crate::config::Config;
use crate::{filters, page};

/// Scan one page's HTML for post links.
///
/// Returns the posts newly added to `known` plus every accepted link on
/// the page (the crawl loop decides which of those still need a visit).
/// Pure over the HTML so resume behavior is testable without a server.
pub fn scan_page(
    html: &str,
    base_url: &str,
    known: &mut FxHashSet<String>,
) -> (Vec<Post>, Vec<String>) {
    let mut new_posts = Vec::new();
    let mut links = Vec::new();
    for href in page::link_hrefs(html) {
        if !filters::is_post_link(&href, base_url) {
            continue;
        }
        let url = match filters::normalize_post_url(&href) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("skipping unparsable link {href}: {e}");
                continue;
            }
        };
        let link = url.to_string();
        if known.insert(link.clone()) {
            new_posts.push(Post::new(link.clone(), filters::post_namespace(&url)));
        }
        links.push(link);
    }
    (new_posts, links)
}

/// Crawl the blog and append newly found posts to the checkpoint.
/// Returns the number of new posts.
///
/// A root fetch failure is fatal (`completed` stays false, so the next
/// invocation retries); failures on deeper pages only skip that page.
pub fn run(config: &Config, client: &Client, progress: &SharedProgress) -> Result<usize> {
    let mut checkpoint = Checkpoint::load(&config.namespace_dir)?;
    if checkpoint.completed {
        log::info!(
            "post discovery already completed ({} posts in checkpoint)",
            checkpoint.posts.len()
        );
        return Ok(0);
    }

    let mut known: FxHashSet<String> = checkpoint.posts.iter().map(|p| p.url.clone()).collect();
    if !known.is_empty() {
        log::info!("resuming discovery with {} known posts", known.len());
    }

    // Visited pages are per-run only. Known posts are never re-added, but
    // their pages are still fetched once on a fresh crawl: a page holding
    // only known links contributes no new work, not zero fetches.
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(config.base_url.clone());

    let pb = progress.stage_line("posts");
    let mut found = 0usize;
    let mut at_root = true;

    log::info!("fetching posts from {} ...", config.base_url);
    while let Some(page_url) = queue.pop_front() {
        if is_shutdown_requested() {
            log::warn!("shutdown requested, stopping discovery (resumes next run)");
            pb.finish_and_clear();
            return Ok(found);
        }
        if !visited.insert(page_url.clone()) {
            continue;
        }
        pb.set_message(page_url.clone());

        let html = match client.fetch_text(&page_url) {
            Ok(html) => html,
            Err(e) if at_root => {
                pb.finish_and_clear();
                return Err(e).with_context(|| format!("failed to fetch blog root {page_url}"));
            }
            Err(e) => {
                log::warn!("skipping {page_url}: {e}");
                continue;
            }
        };
        at_root = false;

        let (new_posts, links) = scan_page(&html, &config.base_url, &mut known);
        for post in new_posts {
            log::info!("adding post: {}", post.url);
            checkpoint.posts.push(post);
            checkpoint.save(&config.namespace_dir)?;
            found += 1;
        }
        for link in links {
            if !visited.contains(&link) {
                queue.push_back(link);
            }
        }
    }

    checkpoint.completed = true;
    checkpoint.save(&config.namespace_dir)?;
    pb.finish_and_clear();
    log::info!(
        "discovery finished: {} posts ({found} new)",
        checkpoint.posts.len()
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.blogspot.com/";

    fn root_html() -> String {
        format!(
            r#"<html><body>
              <a href="{BASE}2021/05/first.html">first</a>
              <a href="{BASE}2021/05/second.html#comments">second</a>
              <a href="{BASE}2021/06/third.html">third</a>
              <a href="{BASE}p/about.html">about</a>
              <a href="{BASE}2021/05/first.html?showComment=99">comment</a>
              <a href="https://elsewhere.example/2021/05/other.html">offsite</a>
            </body></html>"#
        )
    }

    #[test]
    fn scan_finds_posts_and_strips_fragments() {
        let mut known = FxHashSet::default();
        let (posts, links) = scan_page(&root_html(), BASE, &mut known);

        let urls: Vec<&str> = posts.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.blogspot.com/2021/05/first.html",
                "https://example.blogspot.com/2021/05/second.html",
                "https://example.blogspot.com/2021/06/third.html",
            ]
        );
        assert_eq!(links.len(), 3);
        assert_eq!(posts[0].namespace, "/2021/05/first");
        assert!(posts.iter().all(|p| !p.is_pending_completed));
        assert!(posts.iter().all(|p| p.assets.is_empty()));
    }

    #[test]
    fn scan_dedupes_against_known_posts() {
        // Resume: 2 posts already checkpointed, root links those plus 1 new
        let mut known: FxHashSet<String> = [
            "https://example.blogspot.com/2021/05/first.html",
            "https://example.blogspot.com/2021/05/second.html",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let (posts, links) = scan_page(&root_html(), BASE, &mut known);
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].url,
            "https://example.blogspot.com/2021/06/third.html"
        );
        // Known links are still returned for crawling
        assert_eq!(links.len(), 3);
        assert_eq!(known.len(), 3);
    }

    #[test]
    fn scan_same_link_twice_adds_once() {
        let html = format!(
            r#"<a href="{BASE}2021/05/x.html">a</a><a href="{BASE}2021/05/x.html#more">b</a>"#
        );
        let mut known = FxHashSet::default();
        let (posts, links) = scan_page(&html, BASE, &mut known);
        assert_eq!(posts.len(), 1);
        assert_eq!(links.len(), 2);
    }
}
