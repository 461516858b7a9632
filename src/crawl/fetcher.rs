//! The fetch seam: an abstract page fetcher and its Chrome implementation.
//!
//! The traversal only needs "give me the rendered HTML of this URL", so
//! that is the whole trait. Tests drive the traversal with an in-memory
//! fetcher; production uses [`ChromeFetcher`], which owns a headless Chrome
//! process and renders JavaScript before handing back the DOM.

use crate::config::CrawlConfig;
use crate::error::IngestError;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// A fetched, fully rendered page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The page's URL after any redirects; links resolve against this.
    pub final_url: Url,
    /// Serialised DOM after rendering.
    pub html: String,
}

/// Fetches one page at a time. Implementations may hold a browser session
/// or be a plain in-memory map in tests.
pub trait PageFetcher {
    fn fetch(&mut self, url: &Url) -> Result<FetchedPage, IngestError>;
}

/// Production fetcher: one headless Chrome process, one tab.
///
/// The `Browser` guard owns the Chrome child process; dropping the fetcher
/// — on success, error, or panic unwind — terminates it. Navigation waits
/// for the page's ready state up to the configured timeout and then sleeps
/// the settle delay so asynchronous script-driven rendering can finish.
pub struct ChromeFetcher {
    // Field order matters: the tab must drop before the browser it belongs to.
    tab: Arc<Tab>,
    _browser: Browser,
    settle_delay: std::time::Duration,
}

impl ChromeFetcher {
    /// Launch a headless browser configured with the fixed viewport and
    /// spoofed user agent from `config`.
    pub fn launch(config: &CrawlConfig) -> Result<Self, IngestError> {
        let options = LaunchOptionsBuilder::default()
            .headless(true)
            .window_size(Some(config.viewport))
            .build()
            .map_err(|e| IngestError::Browser {
                detail: format!("launch options: {e}"),
            })?;

        let browser = Browser::new(options).map_err(|e| IngestError::Browser {
            detail: format!("failed to launch Chrome: {e}"),
        })?;
        let tab = browser.new_tab().map_err(|e| IngestError::Browser {
            detail: format!("failed to open tab: {e}"),
        })?;

        tab.set_default_timeout(config.ready_timeout);
        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| IngestError::Browser {
                detail: format!("failed to set user agent: {e}"),
            })?;

        info!(
            "Launched headless browser ({}x{})",
            config.viewport.0, config.viewport.1
        );
        Ok(Self {
            tab,
            _browser: browser,
            settle_delay: config.settle_delay,
        })
    }
}

impl PageFetcher for ChromeFetcher {
    fn fetch(&mut self, url: &Url) -> Result<FetchedPage, IngestError> {
        let browser_err = |detail: String| IngestError::Browser { detail };

        self.tab
            .navigate_to(url.as_str())
            .map_err(|e| browser_err(format!("navigate {url}: {e}")))?
            .wait_until_navigated()
            .map_err(|e| browser_err(format!("ready-state wait for {url}: {e}")))?;

        // Heuristic settle pause for late script-driven rendering; pages
        // that render later than this come back incomplete.
        std::thread::sleep(self.settle_delay);

        let html = self
            .tab
            .get_content()
            .map_err(|e| browser_err(format!("content of {url}: {e}")))?;

        let final_url = Url::parse(&self.tab.get_url()).unwrap_or_else(|_| url.clone());
        debug!("Fetched {url} ({} bytes of DOM)", html.len());

        Ok(FetchedPage { final_url, html })
    }
}
