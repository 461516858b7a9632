//! Image encoding: cached thumbnail → base64 data URI.
//!
//! Produces `data:<mime>;base64,<payload>` strings for inline embedding in
//! HTML consumers. The MIME type is inferred purely from the cache file's
//! extension; PDF-derived thumbnails are always saved as PNG upstream, so
//! the PNG default is correct for that path.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::thumbnail::render_page;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A thumbnail encoded for inline embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedThumbnail {
    /// `data:<mime>;base64,<payload>`.
    pub data_uri: String,
    /// MIME type matching the payload, e.g. `image/png`.
    pub mime_type: String,
}

/// Render (or fetch from cache) a page thumbnail and wrap it as a data URI.
///
/// Delegates to [`render_page`]; a soft render failure (`None`) propagates
/// as `Ok(None)`.
pub async fn encode_thumbnail(
    path: impl AsRef<Path>,
    page: usize,
    config: &IngestConfig,
) -> Result<Option<EncodedThumbnail>, IngestError> {
    let Some(cache_path) = render_page(path, page, config).await? else {
        return Ok(None);
    };

    let mime_type = mime_for(&cache_path);
    let bytes = tokio::fs::read(&cache_path)
        .await
        .map_err(|e| IngestError::from_io(&cache_path, e))?;

    let payload = STANDARD.encode(&bytes);
    debug!(
        "Encoded {} → {} bytes base64 ({mime_type})",
        cache_path.display(),
        payload.len()
    );

    Ok(Some(EncodedThumbnail {
        data_uri: format!("data:{mime_type};base64,{payload}"),
        mime_type: mime_type.to_string(),
    }))
}

/// MIME type from the file extension; PNG is the default.
fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_table() {
        assert_eq!(mime_for(Path::new("t.jpg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("t.JPEG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("t.gif")), "image/gif");
        assert_eq!(mime_for(Path::new("t.png")), "image/png");
        // The default also covers extensions with no dedicated mapping.
        assert_eq!(mime_for(Path::new("t.bmp")), "image/png");
        assert_eq!(mime_for(Path::new("t")), "image/png");
    }
}
