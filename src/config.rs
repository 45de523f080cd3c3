//! Configuration for a batch conversion run.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a config between the CLI and library callers and to log exactly
//! what a run was asked to do.

use crate::error::MillError;
use crate::progress::BatchProgress;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one invocation of [`crate::batch::run_batch`].
///
/// # Example
/// ```rust
/// use pdfmill::BatchConfig;
///
/// let config = BatchConfig::builder("data/raw", "data/markdown")
///     .limit(20)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Directory walked recursively for source files.
    pub input_root: PathBuf,

    /// Directory artifacts are written into. Created lazily on first write;
    /// never validated up front.
    pub output_root: PathBuf,

    /// Source file extension, compared exactly as given. Default: "pdf".
    ///
    /// No case normalisation happens: with the default, `REPORT.PDF` is not
    /// picked up. Pass the exact extension your corpus uses.
    pub extension: String,

    /// Process at most this many files, selected as the first N in sorted
    /// full-path order. `None` processes everything.
    pub limit: Option<usize>,

    /// Optional observer for per-file events. The CLI uses this to drive a
    /// progress bar; library callers can leave it unset.
    pub progress: Option<Arc<dyn BatchProgress>>,
}

impl BatchConfig {
    /// Create a builder with the two required directories set.
    pub fn builder(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: BatchConfig {
                input_root: input_root.into(),
                output_root: output_root.into(),
                extension: "pdf".to_string(),
                limit: None,
                progress: None,
            },
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("input_root", &self.input_root)
            .field("output_root", &self.output_root)
            .field("extension", &self.extension)
            .field("limit", &self.limit)
            .field("progress", &self.progress.as_ref().map(|_| "<dyn BatchProgress>"))
            .finish()
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    /// Source extension without the leading dot, e.g. `"pdf"`.
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.config.extension = ext.into();
        self
    }

    /// Cap the number of files processed (first N in sorted order).
    pub fn limit(mut self, n: usize) -> Self {
        self.config.limit = Some(n);
        self
    }

    /// Attach a per-file progress observer.
    pub fn progress(mut self, hook: Arc<dyn BatchProgress>) -> Self {
        self.config.progress = Some(hook);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, MillError> {
        let c = &self.config;
        if c.extension.is_empty() {
            return Err(MillError::InvalidConfig(
                "Extension must not be empty".into(),
            ));
        }
        if c.extension.starts_with('.') {
            return Err(MillError::InvalidConfig(format!(
                "Extension must not include the leading dot, got '{}'",
                c.extension
            )));
        }
        if c.limit == Some(0) {
            return Err(MillError::InvalidConfig(
                "Limit must be ≥ 1 when set".into(),
            ));
        }
        Ok(self.config)
    }
}
