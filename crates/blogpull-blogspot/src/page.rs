//! HTML extraction: each fetched page becomes a finite sequence of
//! candidate URLs, decoupled from the transport so the crawl logic can
//! be tested against canned fixtures.

use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// All `a[href]` values in document order.
pub fn link_hrefs(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let anchors = selector("a[href]");
    doc.select(&anchors)
        .filter_map(|el| el.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// One asset candidate per `img[src]` element.
///
/// When the image sits inside an anchor with an href (Blogspot wraps
/// images in links to the full-size version), the href wins; otherwise
/// the image's own src is the candidate.
pub fn image_candidates(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let images = selector("img[src]");
    let mut candidates = Vec::new();
    for img in doc.select(&images) {
        let wrapper_href = img
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| parent.value().attr("href"))
            .filter(|href| !href.is_empty());
        match wrapper_href {
            Some(href) => candidates.push(href.to_string()),
            None => {
                if let Some(src) = img.value().attr("src").filter(|src| !src.is_empty()) {
                    candidates.push(src.to_string());
                }
            }
        }
    }
    candidates
}
