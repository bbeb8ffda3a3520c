//! The extraction boundary: upload validation and plain-text extraction.
//!
//! Validation runs before any extraction attempt and its failures are never
//! retried. Extraction itself is a pluggable [`TextExtractor`]; the in-repo
//! implementation handles EPUB by walking the spine and stripping markup.
//! PDF is accepted by validation but extracted by an external backend in
//! real deployments; see [`EpubExtractor::extract`].

use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::{debug, info, warn};

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    Pdf,
    Epub,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileKind::Pdf => "PDF",
            FileKind::Epub => "EPUB",
        };
        write!(f, "{}", label)
    }
}

/// Upload size bounds. Both are deployment configuration, not fixed law.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub min_bytes: u64,
    pub max_bytes: u64,
}

/// Everything that can go wrong between an upload and usable text. Each
/// variant carries a message fit to show a user; raw causes go to the log.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Unsupported file type; please upload a PDF or EPUB file")]
    InvalidType,
    #[error("File is too small to be a readable document ({size} bytes, minimum {min})")]
    TooSmall { size: u64, min: u64 },
    #[error("File is too large ({size} bytes, maximum {max})")]
    TooLarge { size: u64, max: u64 },
    #[error("Text extraction timed out")]
    Timeout,
    #[error("No readable text found in this file")]
    NoTextFound,
    #[error("File appears to be corrupted or is not a valid {0}")]
    Corrupted(FileKind),
    #[error("File is encrypted and cannot be read")]
    Encrypted,
    #[error("Text extraction failed: {0}")]
    ProcessingFailed(String),
}

/// Summary facts about an extracted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub word_count: usize,
    pub char_count: usize,
}

/// Successful extraction payload: plain text plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    pub metadata: ExtractionMetadata,
}

impl Extracted {
    pub fn from_text(text: String) -> Self {
        let metadata = ExtractionMetadata {
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
        };
        Self { text, metadata }
    }
}

/// Determine the file kind from name and declared MIME type, permissively:
/// either signal is enough.
pub fn detect_kind(name: &str, mime: &str) -> Option<FileKind> {
    let lower = name.to_ascii_lowercase();
    let mime = mime.to_ascii_lowercase();
    if lower.ends_with(".pdf") || mime == "application/pdf" {
        return Some(FileKind::Pdf);
    }
    if lower.ends_with(".epub") || mime == "application/epub+zip" {
        return Some(FileKind::Epub);
    }
    None
}

/// Validate an upload before extraction. Type is checked first so a
/// mislabeled giant file reads as "wrong type", not "too large".
pub fn validate(
    name: &str,
    mime: &str,
    size: u64,
    limits: SizeLimits,
) -> Result<FileKind, ExtractError> {
    let kind = detect_kind(name, mime).ok_or(ExtractError::InvalidType)?;
    if size < limits.min_bytes {
        return Err(ExtractError::TooSmall {
            size,
            min: limits.min_bytes,
        });
    }
    if size > limits.max_bytes {
        return Err(ExtractError::TooLarge {
            size,
            max: limits.max_bytes,
        });
    }
    Ok(kind)
}

/// Bytes in, plain text out. Implementations must not panic on malformed
/// input; every failure maps to an [`ExtractError`].
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8], kind: FileKind) -> Result<Extracted, ExtractError>;
}

/// EPUB extractor: walks the spine, converts each chapter to plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpubExtractor;

impl TextExtractor for EpubExtractor {
    fn extract(&self, bytes: &[u8], kind: FileKind) -> Result<Extracted, ExtractError> {
        match kind {
            FileKind::Epub => extract_epub(bytes),
            // PDF extraction lives outside this crate; deployments plug in
            // their own TextExtractor for it.
            FileKind::Pdf => Err(ExtractError::ProcessingFailed(
                "no PDF extraction backend is configured".to_string(),
            )),
        }
    }
}

fn extract_epub(bytes: &[u8]) -> Result<Extracted, ExtractError> {
    info!(bytes = bytes.len(), "Extracting EPUB content");
    let mut doc = epub::doc::EpubDoc::from_reader(Cursor::new(bytes.to_vec())).map_err(|err| {
        warn!("Failed to open EPUB container: {err}");
        ExtractError::Corrupted(FileKind::Epub)
    })?;

    let mut combined = String::new();
    let mut chapters = 0usize;

    loop {
        match doc.get_current_str() {
            Some((chapter, _mime)) => {
                chapters += 1;
                if !combined.is_empty() {
                    combined.push_str("\n\n");
                }
                // Lightweight HTML-to-text pass; a very large width avoids
                // baking in hard line breaks so pagination stays in charge
                // of wrapping.
                let plain = match html2text::from_read(chapter.as_bytes(), 10_000) {
                    Ok(clean) => clean,
                    Err(err) => {
                        warn!(chapter = chapters, "html2text failed: {err}");
                        chapter
                    }
                };
                debug!(chapter = chapters, added_chars = plain.len(), "Parsed chapter");
                combined.push_str(&plain);
            }
            None => break,
        }

        if !doc.go_next() {
            break;
        }
    }

    if combined.trim().is_empty() {
        return Err(ExtractError::NoTextFound);
    }

    info!(
        chapters,
        total_chars = combined.len(),
        "Finished extracting EPUB content"
    );
    Ok(Extracted::from_text(combined))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> SizeLimits {
        SizeLimits {
            min_bytes: 100,
            max_bytes: 50 * 1024 * 1024,
        }
    }

    #[test]
    fn detects_kind_from_extension_or_mime() {
        assert_eq!(detect_kind("book.epub", ""), Some(FileKind::Epub));
        assert_eq!(detect_kind("Book.EPUB", ""), Some(FileKind::Epub));
        assert_eq!(detect_kind("paper.pdf", ""), Some(FileKind::Pdf));
        assert_eq!(detect_kind("blob", "application/pdf"), Some(FileKind::Pdf));
        assert_eq!(
            detect_kind("blob", "application/epub+zip"),
            Some(FileKind::Epub)
        );
        assert_eq!(detect_kind("notes.txt", "text/plain"), None);
    }

    #[test]
    fn validation_rejects_each_bound() {
        assert_eq!(
            validate("notes.txt", "text/plain", 5_000, limits()),
            Err(ExtractError::InvalidType)
        );
        assert_eq!(
            validate("tiny.epub", "", 10, limits()),
            Err(ExtractError::TooSmall { size: 10, min: 100 })
        );
        let huge = 60 * 1024 * 1024;
        assert_eq!(
            validate("big.pdf", "", huge, limits()),
            Err(ExtractError::TooLarge {
                size: huge,
                max: 50 * 1024 * 1024
            })
        );
        assert_eq!(validate("ok.epub", "", 5_000, limits()), Ok(FileKind::Epub));
    }

    #[test]
    fn garbage_bytes_read_as_corrupted_epub() {
        let err = EpubExtractor
            .extract(b"definitely not a zip archive", FileKind::Epub)
            .unwrap_err();
        assert_eq!(err, ExtractError::Corrupted(FileKind::Epub));
    }

    #[test]
    fn pdf_without_backend_is_a_processing_failure() {
        let err = EpubExtractor.extract(b"%PDF-1.7 ...", FileKind::Pdf).unwrap_err();
        assert!(matches!(err, ExtractError::ProcessingFailed(_)));
    }

    #[test]
    fn messages_are_user_readable() {
        assert_eq!(
            ExtractError::TooSmall { size: 10, min: 100 }.to_string(),
            "File is too small to be a readable document (10 bytes, minimum 100)"
        );
        assert_eq!(
            ExtractError::NoTextFound.to_string(),
            "No readable text found in this file"
        );
        assert_eq!(
            ExtractError::Corrupted(FileKind::Epub).to_string(),
            "File appears to be corrupted or is not a valid EPUB"
        );
    }

    #[test]
    fn metadata_counts_words_and_chars() {
        let extracted = Extracted::from_text("two words\n\nand two more".to_string());
        assert_eq!(extracted.metadata.word_count, 5);
        assert_eq!(extracted.metadata.char_count, 23);
    }
}
