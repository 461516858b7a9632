//! Optical character recognition via the `tesseract` binary.
//!
//! Recognition runs in a subprocess rather than through C bindings: the
//! binary is universally packaged, language packs are managed by the system,
//! and a crashed recognition cannot take the process down with it. Output is
//! requested on stdout so no temporary result file is needed.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::extract::FailurePolicy;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Recognise text in a raster image.
///
/// Languages come from [`IngestConfig::ocr_languages`] (default `rus+eng`).
/// Under the default [`FailurePolicy::Soft`] any failure — missing binary,
/// missing language pack, unreadable image — is logged and empty text
/// returned, so one bad scan never blocks a batch. Under
/// [`FailurePolicy::Strict`] the error propagates.
pub async fn image_to_text(
    path: impl AsRef<Path>,
    config: &IngestConfig,
) -> Result<String, IngestError> {
    let path = path.as_ref().to_path_buf();
    let languages = config.ocr_languages.clone();
    let policy = config.ocr_failure;

    let result = tokio::task::spawn_blocking(move || run_tesseract(&path, &languages))
        .await
        .map_err(|e| IngestError::Internal(format!("OCR task panicked: {e}")))?;

    match result {
        Ok(text) => Ok(text),
        Err(e) => match policy {
            FailurePolicy::Soft => {
                warn!("OCR failed, returning empty text: {e}");
                Ok(String::new())
            }
            FailurePolicy::Strict => Err(e),
        },
    }
}

fn run_tesseract(path: &Path, languages: &str) -> Result<String, IngestError> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = Command::new("tesseract")
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(languages)
        .output()
        .map_err(|e| IngestError::OcrFailed {
            path: path.to_path_buf(),
            detail: format!("failed to run tesseract: {e}"),
        })?;

    if !output.status.success() {
        return Err(IngestError::OcrFailed {
            path: path.to_path_buf(),
            detail: format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!("OCR produced {} chars for {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;

    #[tokio::test]
    async fn soft_policy_swallows_missing_file() {
        let config = IngestConfig::default();
        let text = image_to_text("/nonexistent/scan.png", &config)
            .await
            .expect("soft policy must not error");
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn strict_policy_propagates_missing_file() {
        let config = IngestConfig::builder()
            .ocr_failure(FailurePolicy::Strict)
            .build()
            .unwrap();
        let err = image_to_text("/nonexistent/scan.png", &config).await;
        assert!(matches!(err, Err(IngestError::FileNotFound { .. })));
    }
}
