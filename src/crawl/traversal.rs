//! Depth-bounded traversal over an abstract page fetcher.
//!
//! The traversal owns the two pieces of crawl state — the visited set and
//! the URL → text result map — behind an explicit contract, and walks the
//! link graph with an iterative worklist instead of call-stack recursion so
//! a deep site cannot overflow the stack.

use crate::crawl::fetcher::PageFetcher;
use crate::extract::html::visible_text;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use url::Url;

/// Single-owner crawl state: which URLs were visited, and what text each
/// produced.
#[derive(Debug, Default)]
pub struct Traversal {
    visited: HashSet<String>,
    pages: HashMap<String, String>,
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `url` has already been fetched (or had a fetch attempted —
    /// failed fetches are never retried).
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    pub fn mark_visited(&mut self, url: &Url) {
        self.visited.insert(url.as_str().to_string());
    }

    /// Record the extracted text for a visited URL.
    pub fn record(&mut self, url: &Url, text: String) {
        self.pages.insert(url.as_str().to_string(), text);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Consume the traversal, yielding the URL → text mapping.
    pub fn into_pages(self) -> HashMap<String, String> {
        self.pages
    }
}

/// Crawl from `start`, following same-host links down to `depth` levels.
///
/// Depth 0 still visits and records the start URL; it just follows no
/// links. A fetch failure is logged and prunes that subtree — the crawl
/// continues elsewhere and the failing URL is simply absent from the
/// result. Pages are visited sequentially, one at a time.
pub fn crawl_with_fetcher<F: PageFetcher>(
    fetcher: &mut F,
    start: &Url,
    depth: u32,
) -> HashMap<String, String> {
    let mut traversal = Traversal::new();
    // Worklist of (url, remaining depth); LIFO gives depth-first order.
    let mut worklist: Vec<(Url, u32)> = vec![(normalized(start.clone()), depth)];

    while let Some((url, remaining)) = worklist.pop() {
        if traversal.is_visited(&url) {
            continue;
        }
        traversal.mark_visited(&url);

        let page = match fetcher.fetch(&url) {
            Ok(page) => page,
            Err(e) => {
                warn!("Fetch failed for {url}, skipping subtree: {e}");
                continue;
            }
        };

        traversal.record(&url, visible_text(&page.html));
        debug!("Visited {url} (remaining depth {remaining})");

        if remaining == 0 {
            continue;
        }
        // Reverse so the depth-first pop order matches document order.
        for link in extract_links(&page.html, &page.final_url).into_iter().rev() {
            if !traversal.is_visited(&link) {
                worklist.push((link, remaining - 1));
            }
        }
    }

    traversal.into_pages()
}

/// Anchor targets of `html`, resolved against `base`, restricted to
/// http(s) links on the same host. Fragments are stripped so `page#a` and
/// `page#b` count as one page.
pub(crate) fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let doc = Html::parse_document(html);
    doc.select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(normalized)
        .filter(|link| {
            matches!(link.scheme(), "http" | "https") && link.host_str() == base.host_str()
        })
        .collect()
}

fn normalized(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_links_keeps_same_host_http_only() {
        let base = Url::parse("https://example.com/docs/").unwrap();
        let html = r##"<body>
            <a href="/about">about</a>
            <a href="page2.html">relative</a>
            <a href="https://example.com/deep#section">fragment</a>
            <a href="https://other.org/">offsite</a>
            <a href="mailto:x@example.com">mail</a>
            <a href="javascript:void(0)">js</a>
        </body>"##;

        let links: Vec<String> = extract_links(html, &base)
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/about",
                "https://example.com/docs/page2.html",
                "https://example.com/deep",
            ]
        );
    }

    #[test]
    fn traversal_deduplicates() {
        let mut t = Traversal::new();
        let url = Url::parse("https://example.com/a").unwrap();
        assert!(!t.is_visited(&url));
        t.mark_visited(&url);
        assert!(t.is_visited(&url));
        t.record(&url, "text".into());
        t.record(&url, "text again".into());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn normalized_strips_fragment_only() {
        let url = Url::parse("https://example.com/a?q=1#frag").unwrap();
        assert_eq!(normalized(url).as_str(), "https://example.com/a?q=1");
    }
}
