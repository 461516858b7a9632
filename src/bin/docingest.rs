//! CLI binary for docingest.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `IngestConfig`/`CrawlConfig` and prints results.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use docingest::{
    CrawlConfig, FailurePolicy, IngestConfig, crawl, encode_thumbnail, html_to_text, image_to_text,
    list_documents, pdf_to_text, render_page,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract text (extractor picked by extension: pdf, html, or image OCR)
  docingest extract report.pdf
  docingest extract scan.png --ocr-langs rus+eng

  # List a user's uploads, filtered
  docingest --media-url /media list /srv/media/uploads/42 --query invoice --json

  # Thumbnail page 3 of a PDF (cached under <media-root>/document_images/)
  docingest --media-root /srv/media thumbnail report.pdf --page 3

  # Inline data URI for embedding
  docingest --media-root /srv/media encode report.pdf

  # Crawl a JS-rendered site two links deep (requires Chrome/Chromium)
  docingest crawl https://example.com --depth 2 --json

EXTERNAL TOOLS:
  tesseract          required for `extract` on images (with language packs)
  Chrome / Chromium  required for `crawl`
  pdfium             loaded at runtime for PDF operations
"#;

/// Document ingestion utilities: text extraction, listing, thumbnails, crawling.
#[derive(Parser, Debug)]
#[command(
    name = "docingest",
    version,
    about = "Extract text, list documents, render thumbnails, crawl rendered sites",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base filesystem path for the thumbnail cache.
    #[arg(long, env = "DOCINGEST_MEDIA_ROOT", default_value = "media", global = true)]
    media_root: PathBuf,

    /// Base URL prefix for constructed file links.
    #[arg(long, env = "DOCINGEST_MEDIA_URL", default_value = "/media", global = true)]
    media_url: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract plain text from a PDF, HTML, or image file.
    Extract {
        file: PathBuf,

        /// Tesseract language pack(s) for image inputs, joined with '+'.
        #[arg(long, default_value = "rus+eng")]
        ocr_langs: String,

        /// Fail instead of returning empty text when OCR breaks.
        #[arg(long)]
        strict: bool,
    },

    /// List the documents of a storage directory.
    List {
        directory: PathBuf,

        /// Case-insensitive substring filter on filenames.
        #[arg(short, long, default_value = "")]
        query: String,

        /// Owner recorded on each entry (display only; URLs use the
        /// directory basename).
        #[arg(long)]
        owner: Option<String>,

        /// Emit JSON records instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Render one page to a cached thumbnail and print the cache path.
    Thumbnail {
        file: PathBuf,

        /// Page number (0-based; ignored for raster sources).
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Maximum thumbnail width in pixels.
        #[arg(long, default_value_t = 800)]
        max_width: u32,

        /// Maximum thumbnail height in pixels.
        #[arg(long, default_value_t = 800)]
        max_height: u32,
    },

    /// Render a page thumbnail and print it as a base64 data URI.
    Encode {
        file: PathBuf,

        /// Page number (0-based; ignored for raster sources).
        #[arg(short, long, default_value_t = 0)]
        page: usize,
    },

    /// Crawl a JavaScript-rendered site and print extracted page text.
    Crawl {
        url: String,

        /// Link-recursion depth bound (0 visits only the start URL).
        #[arg(short, long, default_value_t = 1)]
        depth: i32,

        /// Settle delay in seconds after each page load.
        #[arg(long, default_value_t = 2)]
        settle_secs: u64,

        /// Emit a JSON object mapping URL to text.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let mut builder = IngestConfig::builder()
        .media_root(cli.media_root)
        .media_url(cli.media_url);

    match cli.command {
        Command::Extract {
            file,
            ocr_langs,
            strict,
        } => {
            if strict {
                builder = builder.ocr_failure(FailurePolicy::Strict);
            }
            let config = builder.ocr_languages(ocr_langs).build()?;
            let text = extract_by_extension(&file, &config).await?;
            println!("{text}");
        }

        Command::List {
            directory,
            query,
            owner,
            json,
        } => {
            let config = builder.build()?;
            let records = list_documents(&directory, &query, owner.as_deref(), &config)
                .await
                .with_context(|| format!("listing {}", directory.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for r in &records {
                    println!(
                        "{:<40} {:>10}  {}  {}",
                        r.filename, r.file_size, r.upload_date, r.file_url
                    );
                }
            }
        }

        Command::Thumbnail {
            file,
            page,
            max_width,
            max_height,
        } => {
            let config = builder.thumbnail_max(max_width, max_height).build()?;
            match render_page(&file, page, &config).await? {
                Some(path) => println!("{}", path.display()),
                None => bail!("rendering failed for {} page {page}", file.display()),
            }
        }

        Command::Encode { file, page } => {
            let config = builder.build()?;
            match encode_thumbnail(&file, page, &config).await? {
                Some(thumb) => println!("{}", thumb.data_uri),
                None => bail!("rendering failed for {} page {page}", file.display()),
            }
        }

        Command::Crawl {
            url,
            depth,
            settle_secs,
            json,
        } => {
            let crawl_config =
                CrawlConfig::default().with_settle_delay(Duration::from_secs(settle_secs));
            let pages = crawl(depth, &url, &crawl_config)
                .await
                .with_context(|| format!("crawling {url}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pages)?);
            } else {
                for (url, text) in &pages {
                    println!("── {url}");
                    println!("{text}\n");
                }
            }
        }
    }

    Ok(())
}

/// Pick the extractor from the file extension.
async fn extract_by_extension(file: &Path, config: &IngestConfig) -> Result<String> {
    let ext = file
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let text = match ext.as_str() {
        "pdf" => pdf_to_text(file).await?,
        "html" | "htm" => html_to_text(file).await?,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tif" | "tiff" => {
            image_to_text(file, config).await?
        }
        _ => bail!("no extractor for extension '.{ext}'"),
    };
    Ok(text)
}
