//! Integration tests for the batch orchestrator.
//!
//! A stub [`DocumentEngine`] stands in for pdfium so the full
//! discovery → conversion → persistence flow runs against real temp
//! directories without any native library. Tests use the multi-threaded
//! runtime flavour because the orchestrator drives engines through
//! `tokio::task::block_in_place`.

use pdfmill::{
    run_batch, BatchConfig, BatchProgress, ConvertedDocument, DocumentEngine, FileError,
    MillError,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Deterministic engine: succeeds with stem-derived Markdown unless the
/// source's stem is in `fail_stems`. Counts every invocation.
struct StubEngine {
    fail_stems: Vec<String>,
    calls: AtomicUsize,
}

impl StubEngine {
    fn new() -> Self {
        Self::failing_on(&[])
    }

    fn failing_on(stems: &[&str]) -> Self {
        Self {
            fail_stems: stems.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DocumentEngine for StubEngine {
    fn convert(&self, source: &Path) -> Result<ConvertedDocument, FileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.fail_stems.contains(&stem) {
            return Err(FileError::ConversionFailed {
                path: source.to_path_buf(),
                detail: "stub engine rejected this document".into(),
            });
        }

        Ok(ConvertedDocument {
            markdown: format!("# {stem}\n\nfrom {}\n", source.display()),
            page_count: 3,
        })
    }
}

fn touch(dir: &Path, rel: &str) {
    let p = dir.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(&p, b"%PDF-1.4 stub").unwrap();
}

fn config(input: &Path, output: &Path) -> BatchConfig {
    BatchConfig::builder(input, output).build().unwrap()
}

// ── Whole-batch behaviour ────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn converts_every_file_and_flattens_nested_paths() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.pdf");
    touch(input.path(), "b.pdf");
    touch(input.path(), "sub/c.pdf");

    let engine = StubEngine::new();
    let out = run_batch(&engine, &config(input.path(), output.path()))
        .await
        .unwrap();

    assert_eq!(out.summary.attempted, 3);
    assert_eq!(out.summary.succeeded, 3);
    assert_eq!(out.summary.failed, 0);
    assert_eq!(engine.calls(), 3);

    // Flattened: sub/c.pdf lands at the output root.
    for stem in ["a", "b", "c"] {
        assert!(
            output.path().join(format!("{stem}.md")).is_file(),
            "missing artifact for {stem}"
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn outcomes_follow_sorted_full_path_order() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "b.pdf");
    touch(input.path(), "a.pdf");
    touch(input.path(), "sub/c.pdf");

    let engine = StubEngine::new();
    let out = run_batch(&engine, &config(input.path(), output.path()))
        .await
        .unwrap();

    let sources: Vec<&PathBuf> = out.files.iter().map(|f| &f.source).collect();
    assert_eq!(sources[0], &input.path().join("a.pdf"));
    assert_eq!(sources[1], &input.path().join("b.pdf"));
    assert_eq!(sources[2], &input.path().join("sub/c.pdf"));
}

#[tokio::test(flavor = "multi_thread")]
async fn limit_selects_first_n_in_sorted_order() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "z.pdf");
    touch(input.path(), "a.pdf");
    touch(input.path(), "m.pdf");

    let engine = StubEngine::new();
    let cfg = BatchConfig::builder(input.path(), output.path())
        .limit(2)
        .build()
        .unwrap();
    let out = run_batch(&engine, &cfg).await.unwrap();

    assert_eq!(out.summary.attempted, 2);
    assert_eq!(engine.calls(), 2);
    assert!(output.path().join("a.md").is_file());
    assert!(output.path().join("m.md").is_file());
    assert!(!output.path().join("z.md").exists());
}

// ── Failure isolation ────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn one_bad_file_does_not_abort_the_batch() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.pdf");
    touch(input.path(), "b.pdf");
    touch(input.path(), "c.pdf");

    let engine = StubEngine::failing_on(&["b"]);
    let out = run_batch(&engine, &config(input.path(), output.path()))
        .await
        .unwrap();

    // Every file still gets an attempt and a terminal outcome.
    assert_eq!(out.summary.attempted, 3);
    assert_eq!(out.summary.succeeded, 2);
    assert_eq!(out.summary.failed, 1);
    assert_eq!(engine.calls(), 3);
    assert_eq!(out.files.len(), 3);

    assert!(out.files[0].succeeded());
    assert!(!out.files[1].succeeded());
    assert!(out.files[2].succeeded());

    assert!(output.path().join("a.md").is_file());
    assert!(!output.path().join("b.md").exists());
    assert!(output.path().join("c.md").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_result_carries_file_identity_and_detail() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "broken.pdf");

    let engine = StubEngine::failing_on(&["broken"]);
    let out = run_batch(&engine, &config(input.path(), output.path()))
        .await
        .unwrap();

    let failure = out.files[0].error.as_ref().unwrap();
    let msg = failure.to_string();
    assert!(msg.contains("broken.pdf"), "got: {msg}");
    assert!(msg.contains("rejected"), "got: {msg}");
    assert_eq!(out.files[0].pages, 0);
    assert!(out.files[0].artifact.is_none());
}

// ── Fatal preconditions ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn missing_input_root_is_fatal_with_zero_attempts() {
    let output = TempDir::new().unwrap();
    let engine = StubEngine::new();

    let err = run_batch(
        &engine,
        &config(Path::new("/no/such/input"), output.path()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, MillError::InputDirNotFound { .. }));
    assert_eq!(engine.calls(), 0, "no conversion may be attempted");
}

// ── Idempotence & overwrite semantics ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn rerun_produces_byte_identical_artifacts() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.pdf");
    touch(input.path(), "sub/b.pdf");

    let engine = StubEngine::new();
    let cfg = config(input.path(), output.path());

    run_batch(&engine, &cfg).await.unwrap();
    let first_a = fs::read(output.path().join("a.md")).unwrap();
    let first_b = fs::read(output.path().join("b.md")).unwrap();

    run_batch(&engine, &cfg).await.unwrap();
    assert_eq!(fs::read(output.path().join("a.md")).unwrap(), first_a);
    assert_eq!(fs::read(output.path().join("b.md")).unwrap(), first_b);
}

#[tokio::test(flavor = "multi_thread")]
async fn stem_collision_is_last_write_wins() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    // "c.pdf" sorts before "sub/c.pdf"; both flatten to c.md.
    touch(input.path(), "c.pdf");
    touch(input.path(), "sub/c.pdf");

    let engine = StubEngine::new();
    let out = run_batch(&engine, &config(input.path(), output.path()))
        .await
        .unwrap();

    // Both files are attempted; neither is silently dropped.
    assert_eq!(out.summary.attempted, 2);
    assert_eq!(out.summary.succeeded, 2);

    let content = fs::read_to_string(output.path().join("c.md")).unwrap();
    assert!(
        content.contains("sub"),
        "later source must win the collision, got: {content}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn output_root_is_created_lazily() {
    let input = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("deep/markdown");
    touch(input.path(), "a.pdf");

    let engine = StubEngine::new();
    run_batch(&engine, &config(input.path(), &output))
        .await
        .unwrap();

    assert!(output.join("a.md").is_file());
}

// ── Progress events ──────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl BatchProgress for RecordingProgress {
    fn on_batch_start(&self, total_files: usize) {
        self.events.lock().unwrap().push(format!("start:{total_files}"));
    }

    fn on_file_start(&self, index: usize, _total: usize, _source: &Path) {
        self.events.lock().unwrap().push(format!("file:{index}"));
    }

    fn on_file_converted(&self, index: usize, _total: usize, _source: &Path, pages: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("ok:{index}:{pages}"));
    }

    fn on_file_error(&self, index: usize, _total: usize, _source: &Path, _error: &str) {
        self.events.lock().unwrap().push(format!("err:{index}"));
    }

    fn on_batch_complete(&self, attempted: usize, succeeded: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done:{attempted}:{succeeded}"));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn progress_events_arrive_in_batch_order() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.pdf");
    touch(input.path(), "b.pdf");

    let recorder = Arc::new(RecordingProgress::default());
    let engine = StubEngine::failing_on(&["b"]);
    let cfg = BatchConfig::builder(input.path(), output.path())
        .progress(recorder.clone())
        .build()
        .unwrap();

    run_batch(&engine, &cfg).await.unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec!["start:2", "file:1", "ok:1:3", "file:2", "err:2", "done:2:1"]
    );
}

// ── Run log ──────────────────────────────────────────────────────────────────

/// In-memory writer the fmt subscriber can clone per event.
#[derive(Clone, Default)]
struct LogSink(Arc<Mutex<Vec<u8>>>);

impl LogSink {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn run_log_records_one_attempt_and_one_terminal_line_per_file() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.pdf");
    touch(input.path(), "b.pdf");

    let sink = LogSink::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .with_writer({
            let sink = sink.clone();
            move || sink.clone()
        })
        .finish();
    // The batch future is polled on this thread (no spawn), so a
    // thread-local default subscriber sees every event it emits.
    let _guard = tracing::subscriber::set_default(subscriber);

    let engine = StubEngine::failing_on(&["b"]);
    run_batch(&engine, &config(input.path(), output.path()))
        .await
        .unwrap();

    let log = sink.contents();

    // One attempt line per file, in batch order.
    assert!(log.contains("[1/2] Converting"), "log was: {log}");
    assert!(log.contains("[2/2] Converting"), "log was: {log}");
    assert_eq!(log.matches("Converting").count(), 2, "log was: {log}");

    // Exactly one terminal line per file: success for a, failure for b.
    assert!(log.contains("[1/2] Converted"), "log was: {log}");
    assert!(log.contains("pages=3"), "log was: {log}");
    assert!(!log.contains("[2/2] Converted"), "log was: {log}");
    assert!(log.contains("b.pdf"), "log was: {log}");
    assert!(log.contains("rejected"), "log was: {log}");
    assert_eq!(
        log.matches("Converted ").count() + log.matches("ERROR").count(),
        2,
        "log was: {log}"
    );

    // Batch bookends.
    assert!(log.contains("Discovered 2"), "log was: {log}");
    assert!(log.contains("Conversion complete: 1/2"), "log was: {log}");
}

// ── JSON report ──────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn batch_output_serialises_to_json() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch(input.path(), "a.pdf");

    let engine = StubEngine::new();
    let out = run_batch(&engine, &config(input.path(), output.path()))
        .await
        .unwrap();

    let json = serde_json::to_string_pretty(&out).unwrap();
    assert!(json.contains("\"summary\""));
    assert!(json.contains("\"attempted\": 1"));
    assert!(json.contains("a.pdf"));
}
