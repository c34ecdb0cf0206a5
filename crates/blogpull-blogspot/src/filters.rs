//! URL classification as pure predicates over parsed URL structure.
//!
//! Post links, asset hosts, and the embedded-size hint are all decided
//! here, with no knowledge of where the URLs came from.

use url::Url;

/// Default minimum width hint for kept assets.
pub const DEFAULT_MIN_WIDTH: u32 = 640;

/// Accept an href as a post link: same blog (prefix match on the
/// configured base URL), archive-shaped path, not a comment anchor.
pub fn is_post_link(href: &str, base_url: &str) -> bool {
    if !href.starts_with(base_url) || href.contains("showComment") {
        return false;
    }
    match Url::parse(href) {
        Ok(url) => has_archive_path(&url),
        Err(_) => false,
    }
}

/// Post pages live under `/YYYY/MM/...`.
fn has_archive_path(url: &Url) -> bool {
    let Some(mut segments) = url.path_segments() else {
        return false;
    };
    let year = segments.next().unwrap_or("");
    let month = segments.next().unwrap_or("");
    year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && month.len() == 2
        && month.bytes().all(|b| b.is_ascii_digit())
}

/// Canonical post URL: parsed with the fragment stripped.
pub fn normalize_post_url(href: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(href)?;
    url.set_fragment(None);
    Ok(url)
}

/// Per-post directory name: the URL path with `.html` removed.
pub fn post_namespace(url: &Url) -> String {
    url.path().replace(".html", "")
}

/// Give protocol-relative candidates (`//host/...`) an explicit scheme.
pub fn normalize_scheme(candidate: &str) -> String {
    if candidate.starts_with("//") {
        format!("http:{candidate}")
    } else {
        candidate.to_string()
    }
}

/// Asset-host filter: Blogspot's image CDNs, or the generic
/// `/wp-content/` path prefix for relative references.
pub fn is_asset_url(candidate: &str) -> bool {
    if candidate.starts_with("/wp-content/") {
        return true;
    }
    let Ok(url) = Url::parse(candidate) else {
        return false;
    };
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(is_image_host)
}

fn is_image_host(host: &str) -> bool {
    host == "blogger.googleusercontent.com"
        || host.ends_with(".blogger.googleusercontent.com")
        || host.ends_with(".bp.blogspot.com")
}

/// Width hint from the first path segment shaped like `s<digits>`
/// (Blogspot resize segments: `s1600`, `s0640`, ...).
///
/// The first `s`-prefixed segment decides: a non-numeric remainder means
/// no hint, even if a later segment would parse.
pub fn size_hint(candidate: &str) -> Option<u32> {
    if let Ok(url) = Url::parse(candidate) {
        return first_size_segment(url.path_segments()?);
    }
    // Relative candidates (the /wp-content/ case) carry the same segments
    if let Some(path) = candidate.strip_prefix('/') {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        return first_size_segment(path.split('/'));
    }
    None
}

fn first_size_segment<'a>(segments: impl Iterator<Item = &'a str>) -> Option<u32> {
    for segment in segments {
        if let Some(rest) = segment.strip_prefix('s') {
            return rest.parse().ok();
        }
    }
    None
}

/// Keep only assets with a confidently-large size hint.
pub fn meets_min_width(candidate: &str, min_width: u32) -> bool {
    size_hint(candidate).is_some_and(|width| width >= min_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.blogspot.com/";

    #[test]
    fn post_link_accepted() {
        assert!(is_post_link(
            "https://example.blogspot.com/2021/05/some-post.html",
            BASE
        ));
    }

    #[test]
    fn post_link_rejects_other_site() {
        assert!(!is_post_link(
            "https://other.blogspot.com/2021/05/some-post.html",
            BASE
        ));
    }

    #[test]
    fn post_link_rejects_comment_anchor() {
        assert!(!is_post_link(
            "https://example.blogspot.com/2021/05/some-post.html?showComment=123",
            BASE
        ));
    }

    #[test]
    fn post_link_rejects_non_archive_paths() {
        assert!(!is_post_link("https://example.blogspot.com/p/about.html", BASE));
        assert!(!is_post_link("https://example.blogspot.com/", BASE));
        assert!(!is_post_link(
            "https://example.blogspot.com/21/05/short-year.html",
            BASE
        ));
        assert!(!is_post_link(
            "https://example.blogspot.com/2021/may/word-month.html",
            BASE
        ));
    }

    #[test]
    fn post_link_accepts_month_archive_page() {
        // Archive index pages share the /YYYY/MM shape and are crawled too
        assert!(is_post_link("https://example.blogspot.com/2021/05/", BASE));
    }

    #[test]
    fn normalize_strips_fragment() {
        let url = normalize_post_url("https://example.blogspot.com/2021/05/x.html#more").unwrap();
        assert_eq!(url.as_str(), "https://example.blogspot.com/2021/05/x.html");
    }

    #[test]
    fn namespace_drops_html_suffix() {
        let url = normalize_post_url("https://example.blogspot.com/2021/05/some-post.html").unwrap();
        assert_eq!(post_namespace(&url), "/2021/05/some-post");
    }

    #[test]
    fn scheme_normalization() {
        assert_eq!(
            normalize_scheme("//1.bp.blogspot.com/a/b/s1600/x.jpg"),
            "http://1.bp.blogspot.com/a/b/s1600/x.jpg"
        );
        assert_eq!(normalize_scheme("https://a/b"), "https://a/b");
    }

    #[test]
    fn asset_url_cdn_hosts() {
        assert!(is_asset_url(
            "https://blogger.googleusercontent.com/img/a/AVvXs=s1600"
        ));
        assert!(is_asset_url("http://4.bp.blogspot.com/-x/y/s1600/img.jpg"));
        assert!(is_asset_url("/wp-content/uploads/2021/05/img.jpg"));
    }

    #[test]
    fn asset_url_rejects_other_hosts() {
        assert!(!is_asset_url("https://example.com/wp-content/img.jpg"));
        assert!(!is_asset_url("https://example.blogspot.com/2021/05/x.html"));
        assert!(!is_asset_url("not a url"));
    }

    #[test]
    fn size_hint_parses_first_s_segment() {
        assert_eq!(
            size_hint("http://1.bp.blogspot.com/-x/y/s1600/img.jpg"),
            Some(1600)
        );
        assert_eq!(
            size_hint("http://1.bp.blogspot.com/-x/y/s0640/img.jpg"),
            Some(640)
        );
    }

    #[test]
    fn size_filter_threshold() {
        let keep = "http://1.bp.blogspot.com/a/s0640/img.jpg";
        let drop = "http://1.bp.blogspot.com/a/s320/img.jpg";
        assert!(meets_min_width(keep, DEFAULT_MIN_WIDTH));
        assert!(!meets_min_width(drop, DEFAULT_MIN_WIDTH));
    }

    #[test]
    fn size_filter_drops_without_marker() {
        // No s-prefixed segment at all: conservative drop
        assert!(!meets_min_width(
            "http://1.bp.blogspot.com/a/1600/img.jpg",
            DEFAULT_MIN_WIDTH
        ));
    }

    #[test]
    fn size_hint_on_relative_paths() {
        assert_eq!(size_hint("/wp-content/uploads/s1600/img.jpg"), Some(1600));
        assert_eq!(size_hint("/wp-content/uploads/2021/img.jpg"), None);
    }

    #[test]
    fn size_filter_first_segment_decides() {
        // First s-segment has a non-numeric remainder; later s1600 is ignored
        assert!(!meets_min_width(
            "http://1.bp.blogspot.com/some-album/s1600/img.jpg",
            DEFAULT_MIN_WIDTH
        ));
        assert_eq!(
            size_hint("http://1.bp.blogspot.com/a/s640-h400/img.jpg"),
            None
        );
    }
}
