//! Progress-observer trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgress>`] via
//! [`crate::config::BatchConfigBuilder::progress`] to receive real-time
//! events as the orchestrator works through the batch.
//!
//! The callback approach keeps the library agnostic about how the host
//! application surfaces progress: the CLI forwards events to an `indicatif`
//! bar, a service could forward them to a channel or a database record.
//! Events arrive strictly in order because the batch is processed one file
//! at a time.

use std::path::Path;
use std::sync::Arc;

/// Called by the orchestrator as it works through each source file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `index` is 1-based and matches the attempt-log
/// lines written to the run log.
pub trait BatchProgress: Send + Sync {
    /// Called once after enumeration, before any file is attempted.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file's conversion is invoked.
    fn on_file_start(&self, index: usize, total: usize, source: &Path) {
        let _ = (index, total, source);
    }

    /// Called when a file was converted and its artifact persisted.
    ///
    /// `pages` is the unit count reported by the engine.
    fn on_file_converted(&self, index: usize, total: usize, source: &Path, pages: usize) {
        let _ = (index, total, source, pages);
    }

    /// Called when a file's conversion or write failed.
    fn on_file_error(&self, index: usize, total: usize, source: &Path, error: &str) {
        let _ = (index, total, source, error);
    }

    /// Called once after the last file has been attempted.
    fn on_batch_complete(&self, attempted: usize, succeeded: usize) {
        let _ = (attempted, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl BatchProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressHook = Arc<dyn BatchProgress>;
