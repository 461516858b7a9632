//! PDF text extraction via pdfium.
//!
//! pdfium wraps a C++ library with thread-local state that is not safe to
//! call from async contexts, so the public function delegates the whole
//! extraction to `tokio::task::spawn_blocking` and the blocking core does
//! all pdfium work on a dedicated thread.

use crate::error::IngestError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Extract the text of every page of a PDF, concatenated in page order.
///
/// Pages are joined with no separator, matching the historical output that
/// downstream consumers index. Fail-fast: an unreadable or corrupt file
/// propagates as an error.
pub async fn pdf_to_text(path: impl AsRef<Path>) -> Result<String, IngestError> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || pdf_to_text_blocking(&path))
        .await
        .map_err(|e| IngestError::Internal(format!("PDF extraction task panicked: {e}")))?
}

fn pdf_to_text_blocking(path: &Path) -> Result<String, IngestError> {
    let pdfium = Pdfium::default();
    let document = open_pdf(&pdfium, path)?;

    let mut text = String::new();
    for page in document.pages().iter() {
        let page_text = page.text().map_err(|e| IngestError::CorruptPdf {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;
        text.push_str(&page_text.all());
    }

    debug!("Extracted {} chars from {}", text.len(), path.display());
    Ok(text)
}

/// Open a PDF, mapping pdfium errors onto the crate's error variants.
pub(crate) fn open_pdf<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
) -> Result<PdfDocument<'a>, IngestError> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| IngestError::CorruptPdf {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })
}
