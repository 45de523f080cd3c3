//! # pdfmill
//!
//! Batch-convert a directory tree of PDF documents to Markdown.
//!
//! ## Why this crate?
//!
//! Converting a corpus of a thousand PDFs is not a parsing problem — it is
//! an orchestration problem. Any single document can be corrupt, encrypted,
//! or empty, and one bad file must never take down the other 999. pdfmill
//! owns exactly that orchestration: deterministic discovery, one artifact
//! per source, per-file failure isolation, and an append-only run log that
//! records what succeeded and what did not.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input tree
//!  │
//!  ├─ 1. Enumerate  walk recursively, filter by extension, sort, limit
//!  ├─ 2. Convert    one engine instance, one call per file (pdfium)
//!  ├─ 3. Persist    {output_root}/{stem}.md, tmp-file + rename
//!  └─ 4. Report     per-file outcome + batch summary, console + log file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfmill::{run_batch, BatchConfig, PdfiumEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = PdfiumEngine::new()?;
//!     let config = BatchConfig::builder("data/raw", "data/markdown")
//!         .limit(20)
//!         .build()?;
//!     let output = run_batch(&engine, &config).await?;
//!     eprintln!(
//!         "{}/{} converted, {} failed",
//!         output.summary.succeeded, output.summary.attempted, output.summary.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! Fatal errors ([`MillError`]) abort before any file is attempted: missing
//! input directory, pdfium binding failure. Recoverable errors
//! ([`FileError`]) cover exactly one file: they are logged, counted in the
//! [`BatchSummary`], and the batch continues. A run with partial failures
//! still returns `Ok` — failure visibility lives in the log and summary,
//! not in the exit path.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfmill` binary (clap + anyhow + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfmill = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{run_batch, BatchOutput, BatchSummary, FileResult};
pub use config::{BatchConfig, BatchConfigBuilder};
pub use error::{FileError, MillError};
pub use logging::init_dual_logging;
pub use pipeline::engine::{ConvertedDocument, DocumentEngine, PdfiumEngine};
pub use pipeline::enumerate::{enumerate_sources, SourceFile};
pub use progress::{BatchProgress, NoopProgress, ProgressHook};
