//! Configuration types for document ingestion and crawling.
//!
//! Everything the pipeline needs from its surroundings — the storage
//! settings (`media_root`/`media_url`) and all behavioural knobs — lives in
//! [`IngestConfig`], built via [`IngestConfigBuilder`]. The browser-facing
//! knobs of the crawler are kept in a separate, smaller [`CrawlConfig`]
//! because the crawler is an independent entry point that never touches the
//! document store.

use crate::error::IngestError;
use crate::extract::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the document pipeline (extractors, lister, renderer,
/// encoder).
///
/// # Example
/// ```rust
/// use docingest::IngestConfig;
///
/// let config = IngestConfig::builder()
///     .media_root("/srv/media")
///     .media_url("/media")
///     .thumbnail_max(800, 800)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Base filesystem path under which the thumbnail cache directory
    /// (`document_images/`) is created.
    pub media_root: PathBuf,

    /// Base URL prefix for constructed file links, e.g. `/media`.
    /// Trailing slashes are ignored when URLs are assembled.
    pub media_url: String,

    /// Maximum thumbnail dimensions `(width, height)` in pixels.
    /// Default: `(800, 800)`.
    ///
    /// Thumbnails are only ever scaled **down**: a source already inside the
    /// bound is persisted unmodified, and downscaling preserves aspect ratio
    /// (the longest side is clamped).
    pub thumbnail_max: (u32, u32),

    /// Tesseract language pack(s), joined with `+`. Default: `rus+eng`.
    ///
    /// Two languages are always configured — one regional, one
    /// international — because scanned uploads routinely mix both.
    pub ocr_languages: String,

    /// Failure policy for OCR extraction. Default: [`FailurePolicy::Soft`].
    ///
    /// OCR failures are common (missing language packs, noisy scans) and
    /// under `Soft` they must not block a batch: the error is logged and
    /// empty text returned. PDF and HTML extraction are always fail-fast;
    /// only the best-effort extractor is policy-controlled.
    pub ocr_failure: FailurePolicy,

    /// Failure policy for page rendering. Default: [`FailurePolicy::Soft`].
    ///
    /// Mirrors the OCR policy: under `Soft`, an unsupported extension or a
    /// render error is logged and `None` returned instead of surfacing.
    pub render_failure: FailurePolicy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("media"),
            media_url: "/media".to_string(),
            thumbnail_max: (800, 800),
            ocr_languages: "rus+eng".to_string(),
            ocr_failure: FailurePolicy::Soft,
            render_failure: FailurePolicy::Soft,
        }
    }
}

impl IngestConfig {
    /// Create a new builder for `IngestConfig`.
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder {
            config: Self::default(),
        }
    }

    /// Directory holding cached page thumbnails.
    pub fn cache_dir(&self) -> PathBuf {
        self.media_root.join("document_images")
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn media_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.media_root = root.into();
        self
    }

    pub fn media_url(mut self, url: impl Into<String>) -> Self {
        self.config.media_url = url.into();
        self
    }

    pub fn thumbnail_max(mut self, width: u32, height: u32) -> Self {
        self.config.thumbnail_max = (width.max(1), height.max(1));
        self
    }

    pub fn ocr_languages(mut self, langs: impl Into<String>) -> Self {
        self.config.ocr_languages = langs.into();
        self
    }

    pub fn ocr_failure(mut self, policy: FailurePolicy) -> Self {
        self.config.ocr_failure = policy;
        self
    }

    pub fn render_failure(mut self, policy: FailurePolicy) -> Self {
        self.config.render_failure = policy;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<IngestConfig, IngestError> {
        let c = &self.config;
        if c.media_url.is_empty() {
            return Err(IngestError::InvalidConfig(
                "media_url must not be empty".into(),
            ));
        }
        if c.ocr_languages.is_empty() {
            return Err(IngestError::InvalidConfig(
                "ocr_languages must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Configuration for the recursive crawler's browser session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Browser viewport `(width, height)`. Default: `(1920, 1080)`.
    pub viewport: (u32, u32),

    /// User-agent string presented to crawled sites. Default: a desktop
    /// Chrome UA, because JS-heavy sites serve degraded markup to anything
    /// that looks like a bot.
    pub user_agent: String,

    /// Upper bound on waiting for the page's ready state. Default: 10 s.
    pub ready_timeout: Duration,

    /// Fixed pause after navigation completes, to let asynchronous
    /// script-driven rendering finish. Default: 2 s.
    ///
    /// This is a heuristic, not a guarantee — pages that render later than
    /// the delay are extracted incomplete. Known source of flakiness.
    pub settle_delay: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            viewport: (1920, 1080),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            ready_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(2),
        }
    }
}

impl CrawlConfig {
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let c = IngestConfig::builder().build().unwrap();
        assert_eq!(c.thumbnail_max, (800, 800));
        assert_eq!(c.ocr_languages, "rus+eng");
        assert_eq!(c.ocr_failure, FailurePolicy::Soft);
        assert_eq!(c.render_failure, FailurePolicy::Soft);
    }

    #[test]
    fn builder_rejects_empty_media_url() {
        let err = IngestConfig::builder().media_url("").build();
        assert!(matches!(err, Err(IngestError::InvalidConfig(_))));
    }

    #[test]
    fn thumbnail_max_floors_at_one() {
        let c = IngestConfig::builder().thumbnail_max(0, 0).build().unwrap();
        assert_eq!(c.thumbnail_max, (1, 1));
    }

    #[test]
    fn cache_dir_is_under_media_root() {
        let c = IngestConfig::builder().media_root("/srv/m").build().unwrap();
        assert_eq!(c.cache_dir(), PathBuf::from("/srv/m/document_images"));
    }

    #[test]
    fn crawl_config_defaults() {
        let c = CrawlConfig::default();
        assert_eq!(c.viewport, (1920, 1080));
        assert_eq!(c.settle_delay, Duration::from_secs(2));
        assert_eq!(c.ready_timeout, Duration::from_secs(10));
        assert!(c.user_agent.contains("Chrome"));
    }
}
