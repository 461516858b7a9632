//! HTML visible-text extraction.
//!
//! Strips markup and returns only the text a browser would display: text
//! nodes outside `script`/`style`/`noscript` subtrees, trimmed and joined
//! with single spaces. The same helper backs both the stored-document
//! extractor and the crawler, so crawled pages and uploaded HTML produce
//! identical text shapes.

use crate::error::IngestError;
use scraper::Html;
use std::path::Path;
use tracing::debug;

/// Extract the visible text of a stored HTML document.
///
/// Fail-fast: a missing or non-UTF-8 file propagates as an error.
pub async fn html_to_text(path: impl AsRef<Path>) -> Result<String, IngestError> {
    let path = path.as_ref();
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| IngestError::from_io(path, e))?;

    let text = visible_text(&html);
    debug!("Extracted {} chars from {}", text.len(), path.display());
    Ok(text)
}

/// Join all non-empty, trimmed text nodes of `html` with single spaces,
/// skipping subtrees that never render (`script`, `style`, `noscript`).
pub(crate) fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let mut parts: Vec<&str> = Vec::new();
    for node in doc.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            matches!(
                a.value().as_element().map(|e| e.name()),
                Some("script" | "style" | "noscript")
            )
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}
