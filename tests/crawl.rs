//! Integration tests for the crawl traversal, driven by an in-memory
//! fetcher so no browser is needed.

use docingest::{CrawlConfig, FetchedPage, IngestError, PageFetcher, crawl, crawl_with_fetcher};
use std::cell::RefCell;
use std::collections::HashMap;
use url::Url;

/// Serves pages from a map and counts fetches per URL.
struct FakeFetcher {
    pages: HashMap<String, String>,
    fetch_counts: RefCell<HashMap<String, usize>>,
}

impl FakeFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(u, h)| (u.to_string(), h.to_string()))
                .collect(),
            fetch_counts: RefCell::new(HashMap::new()),
        }
    }

    fn fetches(&self, url: &str) -> usize {
        self.fetch_counts.borrow().get(url).copied().unwrap_or(0)
    }
}

impl PageFetcher for FakeFetcher {
    fn fetch(&mut self, url: &Url) -> Result<FetchedPage, IngestError> {
        *self
            .fetch_counts
            .borrow_mut()
            .entry(url.as_str().to_string())
            .or_insert(0) += 1;

        let html = self
            .pages
            .get(url.as_str())
            .ok_or_else(|| IngestError::Browser {
                detail: format!("no such page: {url}"),
            })?;
        Ok(FetchedPage {
            final_url: url.clone(),
            html: html.clone(),
        })
    }
}

fn start() -> Url {
    Url::parse("https://site.test/").unwrap()
}

#[test]
fn depth_zero_records_only_the_start_url() {
    let mut fetcher = FakeFetcher::new(&[(
        "https://site.test/",
        r#"<body>Home
            <a href="/a">a</a> <a href="/b">b</a> <a href="/c">c</a>
            <a href="/d">d</a> <a href="/e">e</a></body>"#,
    )]);

    let pages = crawl_with_fetcher(&mut fetcher, &start(), 0);
    assert_eq!(pages.len(), 1);
    assert!(pages["https://site.test/"].starts_with("Home"));
}

#[test]
fn cycle_is_visited_at_most_once_and_terminates() {
    let mut fetcher = FakeFetcher::new(&[
        (
            "https://site.test/",
            r#"<body>A <a href="/b">to b</a></body>"#,
        ),
        (
            "https://site.test/b",
            r#"<body>B <a href="/">back to a</a> <a href="/c">to c</a></body>"#,
        ),
        (
            "https://site.test/c",
            r#"<body>C <a href="/">back to a</a></body>"#,
        ),
    ]);

    let pages = crawl_with_fetcher(&mut fetcher, &start(), 2);
    assert_eq!(pages.len(), 3);
    for url in ["https://site.test/", "https://site.test/b", "https://site.test/c"] {
        assert_eq!(fetcher.fetches(url), 1, "{url} fetched more than once");
    }
}

#[test]
fn depth_bound_limits_link_traversal() {
    let mut fetcher = FakeFetcher::new(&[
        ("https://site.test/", r#"<a href="/b">b</a>"#),
        ("https://site.test/b", r#"<a href="/c">c</a>"#),
        ("https://site.test/c", "<p>leaf</p>"),
    ]);

    let pages = crawl_with_fetcher(&mut fetcher, &start(), 1);
    assert_eq!(pages.len(), 2);
    assert!(!pages.contains_key("https://site.test/c"));
    assert_eq!(fetcher.fetches("https://site.test/c"), 0);
}

#[test]
fn off_host_links_are_not_followed() {
    let mut fetcher = FakeFetcher::new(&[
        (
            "https://site.test/",
            r#"<a href="https://other.test/x">offsite</a> <a href="/b">b</a>"#,
        ),
        ("https://site.test/b", "<p>B</p>"),
    ]);

    let pages = crawl_with_fetcher(&mut fetcher, &start(), 3);
    assert_eq!(pages.len(), 2);
    assert_eq!(fetcher.fetches("https://other.test/x"), 0);
}

#[test]
fn fetch_failure_prunes_the_subtree_but_crawl_continues() {
    // "/missing" is not in the map: its fetch fails and its subtree is
    // dropped, while the sibling is still visited.
    let mut fetcher = FakeFetcher::new(&[
        (
            "https://site.test/",
            r#"<a href="/missing">gone</a> <a href="/b">b</a>"#,
        ),
        ("https://site.test/b", "<p>B</p>"),
    ]);

    let pages = crawl_with_fetcher(&mut fetcher, &start(), 2);
    assert_eq!(pages.len(), 2);
    assert!(!pages.contains_key("https://site.test/missing"));
    // Attempted exactly once; dead ends are not retried.
    assert_eq!(fetcher.fetches("https://site.test/missing"), 1);
}

#[test]
fn page_text_is_visible_text_with_single_space_joins() {
    let mut fetcher = FakeFetcher::new(&[(
        "https://site.test/",
        "<body><h1>Title</h1>\n  <p>first</p>\n<script>hidden()</script><p>second</p></body>",
    )]);

    let pages = crawl_with_fetcher(&mut fetcher, &start(), 0);
    assert_eq!(pages["https://site.test/"], "Title first second");
}

#[tokio::test]
async fn negative_depth_is_rejected_before_any_browser_launch() {
    // No Chrome exists in the test environment; getting InvalidDepth (not a
    // Browser error) proves validation precedes resource acquisition.
    let err = crawl(-3, "https://site.test/", &CrawlConfig::default()).await;
    assert!(matches!(err, Err(IngestError::InvalidDepth { depth: -3 })));
}
