//! Error types for the pdfmill library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`MillError`] — **Fatal**: the batch cannot proceed at all (missing
//!   input directory, pdfium binding failure, broken logging setup).
//!   Returned as `Err(MillError)` from [`crate::batch::run_batch`] before
//!   any file has been attempted.
//!
//! * [`FileError`] — **Recoverable**: a single source file failed
//!   (malformed PDF, write error) but every other file is fine. Stored
//!   inside [`crate::batch::FileResult`] so callers can inspect partial
//!   success rather than losing the whole batch to one bad document.
//!
//! The separation is the central failure-handling policy of the crate: a
//! systemic failure aborts before per-item work begins, while a per-file
//! failure is logged, counted, and skipped.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfmill library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::batch::FileResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum MillError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input directory was not found at the given path.
    #[error("Input directory not found: '{path}'\nCheck the path exists and is readable.")]
    InputDirNotFound { path: PathBuf },

    /// The input path exists but is not a directory.
    #[error("Input path is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// Could not bind to a pdfium library at process start.
    #[error(
        "Failed to bind to the pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Install pdfium system-wide (e.g. from bblanchon/pdfium-binaries).\n\
  • Place libpdfium next to the pdfmill binary.\n"
    )]
    EngineBindFailed(String),

    // ── Logging errors ────────────────────────────────────────────────────
    /// Could not create the log directory or open the log file.
    #[error("Failed to set up logging under '{dir}': {source}")]
    LogSetupFailed {
        dir: PathBuf,
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

/// A recoverable error for a single source file.
///
/// Stored in [`crate::batch::FileResult`] when a file fails.
/// The batch continues with the next file regardless.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The conversion engine rejected the document.
    #[error("Conversion failed for '{path}': {detail}")]
    ConversionFailed { path: PathBuf, detail: String },

    /// The converted content could not be persisted.
    #[error("Failed to write artifact '{path}': {detail}")]
    WriteFailed { path: PathBuf, detail: String },
}

impl FileError {
    /// Path of the source or destination file this error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            FileError::ConversionFailed { path, .. } => path,
            FileError::WriteFailed { path, .. } => path,
        }
    }
}
