//! The conversion engine boundary.
//!
//! The batch orchestrator never touches PDF internals; it consumes exactly
//! two operations — a fallible constructor and a fallible per-file convert
//! call — through the [`DocumentEngine`] trait. That seam is what lets the
//! integration tests drive a whole batch with a stub engine and no pdfium
//! library installed.
//!
//! The real implementation, [`PdfiumEngine`], binds to pdfium once per
//! process and is reused for every file in the run. Binding failure is
//! fatal: if the engine cannot be constructed, nothing can be processed.

use crate::error::{FileError, MillError};
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// The converted content for one source file.
///
/// Owned transiently by the orchestrator for the duration of one item;
/// discarded once written and logged.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    /// Rendered Markdown, UTF-8, ends with a single newline.
    pub markdown: String,
    /// Unit count for reporting (pages for PDFs).
    pub page_count: usize,
}

/// An opaque document-conversion capability.
///
/// `convert` must surface any per-document failure as a
/// [`FileError::ConversionFailed`] without crashing the process — the
/// orchestrator catches it and moves on to the next file.
///
/// pdfium is a blocking C library, so the trait is synchronous; the
/// orchestrator calls it through `tokio::task::block_in_place`. The batch
/// is sequential, the engine never crosses a thread boundary, and pdfium's
/// FFI handle is not shareable anyway — so no `Send`/`Sync` bound here.
pub trait DocumentEngine {
    fn convert(&self, source: &Path) -> Result<ConvertedDocument, FileError>;
}

/// Text-extraction engine backed by pdfium.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind to a pdfium library, once per process.
    ///
    /// Resolution order: `PDFIUM_LIB_PATH`, then a copy next to the current
    /// executable's working directory, then the system library.
    pub fn new() -> Result<Self, MillError> {
        let bindings = Self::bind()?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    fn bind() -> Result<Box<dyn PdfiumLibraryBindings>, MillError> {
        if let Ok(dir) = std::env::var("PDFIUM_LIB_PATH") {
            return Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
                .map_err(|e| MillError::EngineBindFailed(format!("{e:?}")));
        }

        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| MillError::EngineBindFailed(format!("{e:?}")))
    }
}

impl DocumentEngine for PdfiumEngine {
    fn convert(&self, source: &Path) -> Result<ConvertedDocument, FileError> {
        let document = self
            .pdfium
            .load_pdf_from_file(source, None)
            .map_err(|e| FileError::ConversionFailed {
                path: source.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

        let pages = document.pages();
        let page_count = pages.len() as usize;
        debug!("Loaded {}: {} pages", source.display(), page_count);

        let mut page_texts = Vec::with_capacity(page_count);
        for (idx, page) in pages.iter().enumerate() {
            let text = page.text().map_err(|e| FileError::ConversionFailed {
                path: source.to_path_buf(),
                detail: format!("Text extraction failed on page {}: {e:?}", idx + 1),
            })?;
            page_texts.push(text.all());
        }

        let title = document
            .metadata()
            .get(PdfDocumentMetadataTagType::Title)
            .map(|t| t.value().to_string())
            .filter(|t| !t.is_empty());

        Ok(ConvertedDocument {
            markdown: assemble_markdown(title.as_deref(), &page_texts),
            page_count,
        })
    }
}

/// Join per-page text blocks into one Markdown document.
///
/// Empty pages are dropped, trailing whitespace is trimmed per block, and
/// the result always ends with exactly one newline — so re-running the
/// batch over unchanged inputs produces byte-identical artifacts.
fn assemble_markdown(title: Option<&str>, pages: &[String]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(pages.len() + 1);

    if let Some(t) = title {
        parts.push(format!("# {t}"));
    }

    for text in pages {
        let trimmed = text.trim_end();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }

    let mut markdown = parts.join("\n\n");
    markdown.push('\n');
    markdown
}
