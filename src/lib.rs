//! # docingest
//!
//! Document ingestion and rendering utilities for a file store: extract
//! plain text from heterogeneous document types (PDF, HTML, raster images),
//! list stored documents with display-ready metadata, render bounded-size
//! page thumbnails behind an on-disk cache, inline-encode thumbnails as
//! data URIs, and crawl JavaScript-rendered sites into a URL → text map.
//!
//! ## Pipeline Overview
//!
//! ```text
//! stored file
//!  │
//!  ├─ extract    PDF (pdfium) / HTML (scraper) / image (tesseract OCR)
//!  ├─ listing    directory scan → DocumentRecord (size, date, URL)
//!  ├─ thumbnail  page → bounded PNG/raster, memoized on disk
//!  └─ encode     cached thumbnail → data:<mime>;base64,<payload>
//!
//! site URL ── crawl ── headless Chrome ── visible text per page
//! ```
//!
//! The document operations are independent, mostly stateless conversions
//! invoked per file; the crawler is a separate self-contained entry point.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docingest::{IngestConfig, list_documents, encode_thumbnail};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = IngestConfig::builder()
//!         .media_root("/srv/media")
//!         .media_url("/media")
//!         .build()?;
//!
//!     for doc in list_documents("/srv/media/uploads/42", "report", None, &config).await? {
//!         if let Some(thumb) = encode_thumbnail(&doc.file_path, 0, &config).await? {
//!             println!("{}: {}", doc.filename, thumb.mime_type);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Failure policy
//!
//! Two policies coexist by design: primary-input extraction (PDF, HTML) and
//! crawl-argument validation are fail-fast, while best-effort batch
//! operations (OCR, thumbnail rendering, a single crawl fetch) default to
//! fail-soft — logged, sentinel returned, batch continues. The soft paths
//! are switchable via [`extract::FailurePolicy`] in [`IngestConfig`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docingest` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod crawl;
pub mod encode;
pub mod error;
pub mod extract;
pub mod listing;
pub mod thumbnail;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CrawlConfig, IngestConfig, IngestConfigBuilder};
pub use crawl::{ChromeFetcher, FetchedPage, PageFetcher, Traversal, crawl, crawl_with_fetcher};
pub use encode::{EncodedThumbnail, encode_thumbnail};
pub use error::IngestError;
pub use extract::{FailurePolicy, html_to_text, image_to_text, pdf_to_text};
pub use listing::{DocumentRecord, list_documents};
pub use thumbnail::{cache_file_name, render_page};
