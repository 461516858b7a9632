//! Error types for the docingest library.
//!
//! A single fatal error type, [`IngestError`], covers every operation. The
//! crate deliberately has **two** failure policies and only fail-fast paths
//! surface here:
//!
//! * **Fail-fast** — a malformed primary input invalidates the whole request
//!   (PDF text extraction, HTML extraction, a negative crawl depth). These
//!   return `Err(IngestError)`.
//!
//! * **Fail-soft** — best-effort operations over many independent inputs
//!   (OCR, page rendering, a single crawl fetch). These log the error and
//!   return an empty/`None` sentinel so batch callers continue. The policy
//!   is configurable per operation via [`crate::extract::FailurePolicy`];
//!   the defaults above are the historical behaviour.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docingest library.
#[derive(Debug, Error)]
pub enum IngestError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension is not one the pipeline knows how to render.
    #[error("Unsupported format '{extension}' for '{path}'")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Requested page index is outside the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium or the image codec failed while producing a thumbnail.
    #[error("Rendering failed for '{path}': {detail}")]
    RenderFailed { path: PathBuf, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The tesseract subprocess could not be run or exited non-zero.
    ///
    /// Only surfaced under [`crate::extract::FailurePolicy::Strict`];
    /// the default policy logs and returns empty text instead.
    #[error("OCR failed for '{path}': {detail}")]
    OcrFailed { path: PathBuf, detail: String },

    // ── Crawler errors ────────────────────────────────────────────────────
    /// Crawl depth must be non-negative; checked before the browser starts.
    #[error("Invalid crawl depth {depth}: depth must be >= 0")]
    InvalidDepth { depth: i32 },

    /// The start URL could not be parsed.
    #[error("Invalid start URL '{url}': {detail}")]
    InvalidUrl { url: String, detail: String },

    /// Launching or driving the headless browser failed.
    #[error("Browser error: {detail}")]
    Browser { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Filesystem operation failed (listing, cache write, thumbnail read).
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IngestError {
    /// Map an io error on `path` to the matching variant.
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => IngestError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => IngestError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => IngestError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_out_of_range_display() {
        let e = IngestError::PageOutOfRange { page: 12, total: 3 };
        let msg = e.to_string();
        assert!(msg.contains("Page 12"), "got: {msg}");
        assert!(msg.contains("3 pages"), "got: {msg}");
    }

    #[test]
    fn invalid_depth_display() {
        let e = IngestError::InvalidDepth { depth: -2 };
        assert!(e.to_string().contains("-2"));
    }

    #[test]
    fn from_io_not_found_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let e = IngestError::from_io(std::path::Path::new("/tmp/x.pdf"), io);
        assert!(matches!(e, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn from_io_permission_maps_to_permission_denied() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let e = IngestError::from_io(std::path::Path::new("/tmp/x.pdf"), io);
        assert!(matches!(e, IngestError::PermissionDenied { .. }));
    }
}
