//! Batch orchestration: the only module with a control-flow contract.
//!
//! The sequence is fixed: enumerate sources (fatal if the input root is
//! unusable) → for each source, in sorted order: log the attempt, convert,
//! persist, log the outcome → log a completion record naming the output
//! root. A failure on one file is recorded and the batch moves on; only
//! precondition and engine-construction failures abort the run.
//!
//! Execution is deliberately single-threaded and sequential. The engine is
//! the one long-lived collaborator and is treated as stateless per call;
//! there is no shared mutable state between items, so log lines and
//! progress events arrive strictly in batch order.

use crate::config::BatchConfig;
use crate::error::{FileError, MillError};
use crate::pipeline::engine::DocumentEngine;
use crate::pipeline::enumerate::{enumerate_sources, SourceFile};
use crate::pipeline::writer::write_artifact;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Terminal outcome for one source file.
///
/// Every enumerated [`SourceFile`] produces exactly one of these — no file
/// is silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    /// Full path of the source file.
    pub source: PathBuf,
    /// Artifact path, present only on success.
    pub artifact: Option<PathBuf>,
    /// Unit count reported by the engine (0 on failure).
    pub pages: usize,
    /// Wall-clock time for this item, conversion plus write.
    pub duration_ms: u64,
    /// The recoverable failure, if any.
    pub error: Option<FileError>,
}

impl FileResult {
    /// True when the artifact was written.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Counts for one invocation, logged as the final record of the run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
}

/// Everything `run_batch` produced: per-file outcomes plus the summary.
#[derive(Debug, Serialize)]
pub struct BatchOutput {
    pub files: Vec<FileResult>,
    pub summary: BatchSummary,
}

/// Convert every matching file under `config.input_root`.
///
/// # Errors
/// Returns `Err(MillError)` only for fatal preconditions (unusable input
/// root). Per-file failures are captured in the returned [`FileResult`]s;
/// the run itself still succeeds — check `output.summary.failed`.
///
/// # Panics
/// Must run inside a multi-threaded tokio runtime: pdfium-backed engines
/// are blocking and are driven through `tokio::task::block_in_place`.
pub async fn run_batch(
    engine: &dyn DocumentEngine,
    config: &BatchConfig,
) -> Result<BatchOutput, MillError> {
    let batch_start = Instant::now();

    let sources = enumerate_sources(&config.input_root, &config.extension, config.limit)?;
    let total = sources.len();
    info!(
        "Discovered {} '.{}' files under {}",
        total,
        config.extension,
        config.input_root.display()
    );

    if let Some(ref hook) = config.progress {
        hook.on_batch_start(total);
    }

    let mut files: Vec<FileResult> = Vec::with_capacity(total);
    for (index, source) in sources.iter().enumerate() {
        let index = index + 1;
        files.push(process_one(engine, config, source, index, total).await);
    }

    let succeeded = files.iter().filter(|f| f.succeeded()).count();
    let summary = BatchSummary {
        attempted: total,
        succeeded,
        failed: total - succeeded,
        total_duration_ms: batch_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {}/{} files, {} failed. Outputs written to {}",
        summary.succeeded,
        summary.attempted,
        summary.failed,
        config.output_root.display()
    );

    if let Some(ref hook) = config.progress {
        hook.on_batch_complete(summary.attempted, summary.succeeded);
    }

    Ok(BatchOutput { files, summary })
}

/// Attempt one file: convert, persist, log exactly one terminal record.
async fn process_one(
    engine: &dyn DocumentEngine,
    config: &BatchConfig,
    source: &SourceFile,
    index: usize,
    total: usize,
) -> FileResult {
    info!("[{}/{}] Converting {}", index, total, source.path.display());
    if let Some(ref hook) = config.progress {
        hook.on_file_start(index, total, &source.path);
    }

    let start = Instant::now();

    // pdfium is blocking; keep the runtime's worker threads responsive.
    let converted = tokio::task::block_in_place(|| engine.convert(&source.path));

    let outcome = match converted {
        Ok(doc) => write_artifact(source, &doc.markdown, &config.output_root)
            .await
            .map(|artifact| (artifact, doc.page_count)),
        Err(e) => Err(e),
    };
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok((artifact, pages)) => {
            info!(
                "[{}/{}] Converted {} (pages={})",
                index,
                total,
                source.path.display(),
                pages
            );
            if let Some(ref hook) = config.progress {
                hook.on_file_converted(index, total, &source.path, pages);
            }
            FileResult {
                source: source.path.clone(),
                artifact: Some(artifact),
                pages,
                duration_ms,
                error: None,
            }
        }
        Err(e) => {
            error!("[{}/{}] {}", index, total, e);
            if let Some(ref hook) = config.progress {
                hook.on_file_error(index, total, &source.path, &e.to_string());
            }
            FileResult {
                source: source.path.clone(),
                artifact: None,
                pages: 0,
                duration_ms,
                error: Some(e),
            }
        }
    }
}
