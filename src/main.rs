//! Entry point for the bionic reading pipeline.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Validate and extract the requested document.
//! - Run the pipeline: normalize, paginate, resume the saved position.

use anyhow::{Context, Result, anyhow};
use bionic_reader::batch::paginate_batched;
use bionic_reader::bionic::BionicTiering;
use bionic_reader::cancellation::CancellationToken;
use bionic_reader::capacity::{self, Chrome, FontMetrics, Viewport};
use bionic_reader::config::{AppConfig, load_config};
use bionic_reader::extract::{self, EpubExtractor, Extracted, SizeLimits, TextExtractor, validate};
use bionic_reader::library::{FsStore, Library};
use bionic_reader::pagination::PaginationTuning;
use bionic_reader::{normalizer, position, processor};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let path = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %path.display(),
        level = %config.log_level,
        "Starting reading session"
    );

    let extracted = load_document(&path, &config)?;
    info!(
        words = extracted.metadata.word_count,
        chars = extracted.metadata.char_count,
        "Extracted document"
    );

    let document = normalizer::normalize(&extracted.text);
    let capacity = capacity::estimate(
        Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
        },
        FontMetrics::from_config(&config),
        Chrome::from_config(&config),
        &config,
    );
    debug!(?capacity, "Estimated viewport capacity");

    let tuning = PaginationTuning::from_config(&config);
    let token = CancellationToken::new();
    let sections = paginate_batched(
        &document,
        &capacity,
        &tuning,
        config.batch_size,
        &token,
        |progress| {
            debug!(
                done = progress.paragraphs_done,
                total = progress.paragraphs_total,
                sections = progress.sections_so_far,
                "Pagination progress"
            );
        },
    )?;
    info!(sections = sections.len(), "Paginated document");

    let library = Library::new(FsStore::new(&config.cache_dir));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    let entry = library
        .entries()
        .into_iter()
        .find(|entry| entry.name == name && entry.size == size);
    let (id, saved_position) = match entry {
        Some(entry) => {
            info!(id = %entry.id, "Document already in library");
            (entry.id, entry.reading_position)
        }
        None => {
            let kind = extract::detect_kind(&name, "").unwrap_or(extract::FileKind::Epub);
            let id = library.save_document(&name, size, kind, extracted.metadata, &document)?;
            info!(%id, "Added document to library");
            (id, None)
        }
    };

    let resume_index = match &saved_position {
        Some(saved) => position::locate(&sections, &document, saved),
        None => 0,
    };
    if let Some(saved) = &saved_position {
        info!(
            section = resume_index,
            percentage = saved.percentage,
            "Resuming from saved position"
        );
    }

    if let Some(section) = sections.get(resume_index) {
        let tiering = BionicTiering::from_config(&config);
        let processed = processor::process(section, config.bionic, &tiering);
        debug!(
            section = resume_index,
            bionic = processed.is_bionic,
            markup_chars = processed.processed.len(),
            "Rendered current section"
        );
        if let Some(pos) = position::capture(&sections, resume_index, &document, config.snippet_len)
        {
            library.update_position(&id, pos, resume_index);
        }
    }

    let usage = library.storage_usage();
    info!(
        index_bytes = usage.index_bytes,
        text_bytes = usage.text_bytes,
        "Session ready"
    );
    Ok(())
}

/// Validate and extract the document at `path`.
///
/// Plain-text files skip the extraction service entirely (useful for
/// development); everything else goes through upload validation and the
/// EPUB extractor.
fn load_document(path: &Path, config: &AppConfig) -> Result<Extracted> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();

    if is_text_file(path) {
        info!(path = %path.display(), "Loading plain text content");
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Extracted::from_text(text));
    }

    let limits = SizeLimits {
        min_bytes: config.min_file_bytes,
        max_bytes: config.max_file_bytes,
    };
    let kind = validate(&name, "", size, limits)
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("Rejected {}", path.display()))?;

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    EpubExtractor
        .extract(&bytes, kind)
        .map_err(|err| anyhow!("{err}"))
}

fn is_text_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase()),
        Some(ext) if ext == "txt"
    )
}

fn parse_args() -> Result<PathBuf> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("Usage: bionic-reader <path-to-book>"))?;

    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.as_path().display()));
    }
    Ok(path)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
