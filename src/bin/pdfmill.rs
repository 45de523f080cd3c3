//! CLI binary for pdfmill.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `BatchConfig`, installs the dual-sink logger, and prints the summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfmill::{
    init_dual_logging, run_batch, BatchConfig, BatchProgress, MillError, PdfiumEngine,
    ProgressHook,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress hook using indicatif ────────────────────────────────────────

/// Terminal progress: a bar across the batch plus one ✓/✗ line per file.
/// Files are processed strictly in order, so one start-time slot suffices.
struct CliProgress {
    bar: ProgressBar,
    current_start: Mutex<Option<Instant>>,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            current_start: Mutex::new(None),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.current_start
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl BatchProgress for CliProgress {
    fn on_batch_start(&self, total_files: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} files  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_files as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }

    fn on_file_start(&self, _index: usize, _total: usize, source: &Path) {
        *self.current_start.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(
            source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    }

    fn on_file_converted(&self, index: usize, total: usize, source: &Path, pages: usize) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} {:>4}/{:<4} {}  {}  {}",
            green("✓"),
            index,
            total,
            source.display(),
            dim(&format!("{pages:>4} pages")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, source: &Path, error: &str) {
        let secs = self.elapsed_secs();
        let msg = truncate_error(error);

        self.bar.println(format!(
            "  {} {:>4}/{:<4} {}  {}  {}",
            red("✗"),
            index,
            total,
            source.display(),
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, attempted: usize, succeeded: usize) {
        let failed = attempted.saturating_sub(succeeded);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files converted successfully",
                green("✔"),
                bold(&succeeded.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} failed)",
                if succeeded == 0 { red("✘") } else { cyan("⚠") },
                bold(&succeeded.to_string()),
                attempted,
                red(&failed.to_string()),
            );
        }
    }
}

/// Truncate very long error messages to keep per-file output tidy.
///
/// Error strings carry source paths and pdfium detail, so the cut must
/// land on a char boundary — never mid-codepoint.
fn truncate_error(error: &str) -> String {
    if error.len() <= 80 {
        return error.to_string();
    }
    let mut end = 79;
    while !error.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\u{2026}", &error[..end])
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert an entire tree
  pdfmill data/raw data/markdown

  # Smoke-test the first 20 files (sorted by path)
  pdfmill data/raw data/markdown --limit 20

  # Keep run logs next to the outputs
  pdfmill data/raw data/markdown --log-dir data/logs

  # Machine-readable per-file outcomes
  pdfmill data/raw data/markdown --json > report.json

OUTPUT LAYOUT:
  Every matching file {stem}.pdf under INPUT_DIR produces OUTPUT_DIR/{stem}.md.
  Nested sources are flattened to their base name; a stem collision is
  reported in the log and the later file (in sorted order) wins.

EXIT STATUS:
  0  the batch ran, even if some files failed (check the log / --json)
  1  fatal error before any file was attempted (missing input directory,
     pdfium binding failure, broken log setup)

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium directory
  RUST_LOG          Overrides the log filter derived from -q / -v
"#;

/// Convert a directory tree of PDFs to Markdown, one artifact per file.
#[derive(Parser, Debug)]
#[command(
    name = "pdfmill",
    version,
    about = "Batch-convert a directory tree of PDFs to Markdown",
    long_about = "Walk INPUT_DIR recursively, convert every matching PDF through a single \
long-lived pdfium engine, and write one Markdown artifact per source into OUTPUT_DIR. \
A failing file is logged and skipped; it never aborts the batch.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory walked recursively for source files.
    input_dir: PathBuf,

    /// Directory artifacts are written into (created lazily).
    output_dir: PathBuf,

    /// Process at most N files, first N in sorted full-path order.
    #[arg(short, long, env = "PDFMILL_LIMIT")]
    limit: Option<usize>,

    /// Source extension, matched exactly as given.
    #[arg(long, env = "PDFMILL_EXTENSION", default_value = "pdf")]
    extension: String,

    /// Directory for the append-only run log (conversion.log).
    #[arg(long, env = "PDFMILL_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Print per-file outcomes and the summary as JSON on stdout.
    #[arg(long, env = "PDFMILL_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDFMILL_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level logs.
    #[arg(short, long, env = "PDFMILL_VERBOSE")]
    verbose: bool,

    /// Suppress all console output except errors.
    #[arg(short, long, env = "PDFMILL_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Console INFO lines are suppressed while the progress bar is active —
    // the bar carries the same per-file feedback. The file sink is pinned
    // at INFO inside init_dual_logging, so the run log keeps the full
    // record either way.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    init_dual_logging(&cli.log_dir, filter)?;

    // ── Fail-fast preconditions ──────────────────────────────────────────
    // Validate the input root before constructing the engine so the two
    // fatal cases surface in a predictable order.
    if !cli.input_dir.exists() {
        return Err(MillError::InputDirNotFound {
            path: cli.input_dir.clone(),
        }
        .into());
    }
    if !cli.input_dir.is_dir() {
        return Err(MillError::NotADirectory {
            path: cli.input_dir.clone(),
        }
        .into());
    }

    // ── Engine: constructed once, reused for every file ──────────────────
    let engine = PdfiumEngine::new().context("Failed to initialise the PDF engine")?;

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = BatchConfig::builder(&cli.input_dir, &cli.output_dir)
        .extension(cli.extension.as_str());
    if let Some(n) = cli.limit {
        builder = builder.limit(n);
    }
    if show_progress {
        builder = builder.progress(CliProgress::new() as ProgressHook);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run batch ────────────────────────────────────────────────────────
    let output = run_batch(&engine, &config).await?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise batch output")?
        );
    } else if !cli.quiet && !show_progress {
        // The progress hook already printed the summary line otherwise.
        eprintln!(
            "Converted {}/{} files in {}ms",
            output.summary.succeeded, output.summary.attempted, output.summary.total_duration_ms
        );
        if output.summary.failed > 0 {
            eprintln!("  {} files failed (see the run log)", output.summary.failed);
        }
    }

    // Partial failure is still overall success: failures are reported in
    // the log and summary, never escalated to the exit code.
    Ok(())
}
