//! Recursive crawler: render JavaScript-driven pages and extract their text.
//!
//! A self-contained entry point, unrelated to the document pipeline: it
//! drives a headless browser to fetch a start URL, waits for rendering,
//! extracts visible text, and follows same-host links down to a depth
//! bound. The result is a URL → text mapping; pages whose fetch failed are
//! absent from it (logged, never retried).
//!
//! ## Structure
//!
//! * [`fetcher`] — the [`PageFetcher`] seam and the Chrome-backed
//!   implementation that owns the browser process.
//! * [`traversal`] — the worklist algorithm plus the visited/result state.

pub mod fetcher;
pub mod traversal;

pub use fetcher::{ChromeFetcher, FetchedPage, PageFetcher};
pub use traversal::{Traversal, crawl_with_fetcher};

use crate::config::CrawlConfig;
use crate::error::IngestError;
use std::collections::HashMap;
use tracing::info;
use url::Url;

/// Crawl `start_url` to `depth` levels and return a URL → text mapping.
///
/// The browser process is launched after validation and is terminated on
/// every exit path, including errors, by the fetcher's drop. Crawling is
/// sequential: total wall-clock time grows with pages visited × settle
/// delay.
///
/// # Errors
/// * [`IngestError::InvalidDepth`] — `depth < 0`, rejected before any
///   browser or network resource is acquired.
/// * [`IngestError::InvalidUrl`] — unparseable start URL.
/// * [`IngestError::Browser`] — the browser failed to launch.
///
/// Per-page fetch failures are not errors; they prune that subtree.
pub async fn crawl(
    depth: i32,
    start_url: &str,
    config: &CrawlConfig,
) -> Result<HashMap<String, String>, IngestError> {
    if depth < 0 {
        return Err(IngestError::InvalidDepth { depth });
    }
    let start = Url::parse(start_url).map_err(|e| IngestError::InvalidUrl {
        url: start_url.to_string(),
        detail: e.to_string(),
    })?;

    let depth = depth as u32;
    let config = config.clone();

    let pages = tokio::task::spawn_blocking(move || -> Result<_, IngestError> {
        let mut fetcher = ChromeFetcher::launch(&config)?;
        Ok(crawl_with_fetcher(&mut fetcher, &start, depth))
        // `fetcher` drops here on both paths, killing the Chrome child.
    })
    .await
    .map_err(|e| IngestError::Internal(format!("Crawl task panicked: {e}")))??;

    info!("Crawl finished: {} pages", pages.len());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn negative_depth_is_rejected_without_a_browser() {
        // Must fail fast: no Chrome is installed in CI, so reaching the
        // launch path would produce a Browser error instead.
        let err = crawl(-1, "https://example.com", &CrawlConfig::default()).await;
        assert!(matches!(err, Err(IngestError::InvalidDepth { depth: -1 })));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_without_a_browser() {
        let err = crawl(0, "not a url", &CrawlConfig::default()).await;
        assert!(matches!(err, Err(IngestError::InvalidUrl { .. })));
    }
}
