//! Text extractors: one per stored document format.
//!
//! Each extractor takes a file path and returns the extracted plain text
//! (possibly empty). They are independent and stateless; callers pick the
//! extractor by the file's format.
//!
//! ## Failure policy
//!
//! PDF and HTML extraction are **fail-fast**: an unreadable or malformed
//! input invalidates the single-item request and the error propagates. OCR
//! is **best-effort** by default — recognition failures are common and must
//! not block a batch of independent files — and returns empty text under
//! [`FailurePolicy::Soft`]. The split is deliberate and configurable through
//! [`crate::IngestConfig`] rather than hard-coded per extractor.

pub mod html;
pub mod ocr;
pub mod pdf;

use serde::{Deserialize, Serialize};

pub use html::html_to_text;
pub use ocr::image_to_text;
pub use pdf::pdf_to_text;

/// What a best-effort operation does when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Log the error and return an empty/`None` sentinel; the caller
    /// continues. (default for OCR and rendering)
    #[default]
    Soft,
    /// Propagate the error to the caller.
    Strict,
}
