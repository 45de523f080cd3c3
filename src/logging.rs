//! Dual-sink logging: interactive console plus an append-only run log.
//!
//! One subscriber is installed at process start and feeds two sinks —
//! stderr for the operator watching the run, and `{log_dir}/conversion.log`
//! as the audit trail. The sinks are filtered independently: the console
//! follows the CLI verbosity (and `RUST_LOG`), while the file always
//! records at INFO so the attempt/outcome lines of a run survive even when
//! the console is quieted by a progress bar. The file is opened in append
//! mode so successive runs accumulate in one place; nothing is ever
//! truncated or rewritten. Records are flushed per event and the sinks
//! stay open for the process lifetime, so there is no teardown to forget.
//!
//! Library code never calls into this module; it emits through the
//! `tracing` macros and whatever subscriber the host installed picks the
//! records up. The binary is the one caller of [`init_dual_logging`].

use crate::error::MillError;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Name of the run log file under the log directory.
pub const LOG_FILE_NAME: &str = "conversion.log";

/// Create `log_dir` if needed and open the run log in append mode.
pub fn open_log_file(log_dir: &Path) -> Result<File, MillError> {
    let setup_failed = |e: io::Error| MillError::LogSetupFailed {
        dir: log_dir.to_path_buf(),
        source: e,
    };

    std::fs::create_dir_all(log_dir).map_err(setup_failed)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))
        .map_err(setup_failed)
}

/// Install the process-wide subscriber with both sinks attached.
///
/// `console_filter` applies to the stderr sink when `RUST_LOG` is unset
/// (the CLI derives it from its verbosity flags). The file sink is pinned
/// at INFO regardless. Must be called at most once per process; a second
/// call reports [`MillError::Internal`].
pub fn init_dual_logging(log_dir: &Path, console_filter: &str) -> Result<(), MillError> {
    let log_file = open_log_file(log_dir)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file))
                .with_filter(LevelFilter::INFO),
        )
        .try_init()
        .map_err(|e| MillError::Internal(format!("Failed to install subscriber: {e}")))?;

    Ok(())
}
