//! Page rendering and the on-disk thumbnail cache.
//!
//! One page of a PDF (or a raster image) is rendered to a bounded-size
//! thumbnail and memoized on disk under `{media_root}/document_images/`.
//!
//! ## Cache key
//!
//! The cache filename is `page_<hex(md5(path))>_<page>.<ext>` — an MD5
//! digest over the raw path string, hex-encoded. Keying on the **path**
//! rather than the content is a known staleness limitation: a document
//! modified in place keeps serving its old thumbnail. Existence of the cache
//! file skips the render entirely; there is no expiry or invalidation.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::extract::FailurePolicy;
use crate::extract::pdf::open_pdf;
use image::DynamicImage;
use md5::{Digest, Md5};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Raster formats accepted directly (everything else must be a PDF).
const RASTER_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

/// Supersampling factor for PDF rasterisation. Pages are rendered at twice
/// the nominal size and then downscaled, which keeps glyph edges crisp in
/// small thumbnails.
const SUPERSAMPLE: f32 = 2.0;

/// Render page `page` of `path` to a cached thumbnail, returning the cache
/// path.
///
/// A cache hit returns immediately without touching the renderer or
/// checking staleness. On a miss, PDFs are rasterised at 2× and raster
/// images loaded directly; either is then downscaled (aspect preserved)
/// only if a dimension exceeds [`IngestConfig::thumbnail_max`], and
/// persisted.
///
/// Under the default [`FailurePolicy::Soft`], unsupported extensions,
/// out-of-range pages, and render errors are logged and yield `Ok(None)`;
/// [`FailurePolicy::Strict`] propagates them.
pub async fn render_page(
    path: impl AsRef<Path>,
    page: usize,
    config: &IngestConfig,
) -> Result<Option<PathBuf>, IngestError> {
    let path = path.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || {
        match render_page_blocking(&path, page, &config) {
            Ok(cache_path) => Ok(Some(cache_path)),
            Err(e) => match config.render_failure {
                FailurePolicy::Soft => {
                    warn!("Render failed for {} page {page}: {e}", path.display());
                    Ok(None)
                }
                FailurePolicy::Strict => Err(e),
            },
        }
    })
    .await
    .map_err(|e| IngestError::Internal(format!("Render task panicked: {e}")))?
}

/// Deterministic cache filename for `(path, page)`.
///
/// Same inputs always map to the same name; distinct pages of one file and
/// the same page of two files get distinct names (barring an MD5 collision,
/// which is not handled).
pub fn cache_file_name(path: &Path, page: usize, ext: &str) -> String {
    let digest = Md5::digest(path.to_string_lossy().as_bytes());
    format!("page_{}_{}.{}", hex::encode(digest), page, ext)
}

fn render_page_blocking(
    path: &Path,
    page: usize,
    config: &IngestConfig,
) -> Result<PathBuf, IngestError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    // PDF thumbnails are always PNG; raster sources keep their extension so
    // the encoder's extension-based MIME inference stays truthful.
    let is_pdf = extension == "pdf";
    let cache_ext = if is_pdf { "png" } else { extension.as_str() };

    if !is_pdf && !RASTER_EXTENSIONS.contains(&extension.as_str()) {
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    }

    let cache_dir = config.cache_dir();
    std::fs::create_dir_all(&cache_dir).map_err(|e| IngestError::from_io(&cache_dir, e))?;

    let cache_path = cache_dir.join(cache_file_name(path, page, cache_ext));
    if cache_path.exists() {
        debug!("Cache hit: {}", cache_path.display());
        return Ok(cache_path);
    }

    let image = if is_pdf {
        render_pdf_page(path, page)?
    } else {
        image::open(path).map_err(|e| IngestError::RenderFailed {
            path: path.to_path_buf(),
            detail: format!("image decode: {e}"),
        })?
    };

    let image = fit_within(image, config.thumbnail_max);
    image.save(&cache_path).map_err(|e| IngestError::RenderFailed {
        path: path.to_path_buf(),
        detail: format!("thumbnail encode: {e}"),
    })?;

    debug!(
        "Rendered {} page {page} → {} ({}x{})",
        path.display(),
        cache_path.display(),
        image.width(),
        image.height()
    );
    Ok(cache_path)
}

/// Rasterise one PDF page at the supersampling factor.
fn render_pdf_page(path: &Path, page: usize) -> Result<DynamicImage, IngestError> {
    let pdfium = Pdfium::default();
    let document = open_pdf(&pdfium, path)?;
    let pages = document.pages();
    let total = pages.len() as usize;

    if page >= total {
        return Err(IngestError::PageOutOfRange { page, total });
    }

    let pdf_page = pages
        .get(page as u16)
        .map_err(|e| IngestError::RenderFailed {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    // Render at SUPERSAMPLE× the page's nominal point size.
    let width_points = pdf_page.width().value;
    let height_points = pdf_page.height().value;
    let render_config = PdfRenderConfig::new()
        .set_target_width(((width_points * SUPERSAMPLE) as i32).max(1))
        .set_target_height(((height_points * SUPERSAMPLE) as i32).max(1));
    let bitmap = pdf_page
        .render_with_config(&render_config)
        .map_err(|e| IngestError::RenderFailed {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    Ok(bitmap.as_image())
}

/// Downscale to fit `(max_w, max_h)`, preserving aspect ratio. Images
/// already within the bound are returned unmodified — thumbnails never
/// upscale.
fn fit_within(image: DynamicImage, (max_w, max_h): (u32, u32)) -> DynamicImage {
    if image.width() > max_w || image.height() > max_h {
        image.thumbnail(max_w, max_h)
    } else {
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn cache_name_is_deterministic() {
        let p = Path::new("/srv/uploads/7/report.pdf");
        assert_eq!(cache_file_name(p, 0, "png"), cache_file_name(p, 0, "png"));
    }

    #[test]
    fn cache_name_differs_per_page() {
        let p = Path::new("/srv/uploads/7/report.pdf");
        assert_ne!(cache_file_name(p, 0, "png"), cache_file_name(p, 1, "png"));
    }

    #[test]
    fn cache_name_differs_per_path() {
        let a = Path::new("/srv/uploads/7/report.pdf");
        let b = Path::new("/srv/uploads/8/report.pdf");
        assert_ne!(cache_file_name(a, 0, "png"), cache_file_name(b, 0, "png"));
    }

    #[test]
    fn cache_name_shape() {
        let name = cache_file_name(Path::new("/a/b.pdf"), 3, "png");
        // page_<32 hex chars>_<page>.<ext>
        assert!(name.starts_with("page_"), "got: {name}");
        assert!(name.ends_with("_3.png"), "got: {name}");
        let hash = &name["page_".len()..name.len() - "_3.png".len()];
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fit_within_clamps_longest_side() {
        let wide = DynamicImage::ImageRgba8(RgbaImage::new(1600, 400));
        let out = fit_within(wide, (800, 800));
        assert_eq!((out.width(), out.height()), (800, 200));
    }

    #[test]
    fn fit_within_leaves_small_images_untouched() {
        let small = DynamicImage::ImageRgba8(RgbaImage::new(400, 300));
        let out = fit_within(small, (800, 800));
        assert_eq!((out.width(), out.height()), (400, 300));
    }

    #[test]
    fn fit_within_clamps_tall_images() {
        let tall = DynamicImage::ImageRgba8(RgbaImage::new(400, 1600));
        let out = fit_within(tall, (800, 800));
        assert_eq!((out.width(), out.height()), (200, 800));
    }
}
