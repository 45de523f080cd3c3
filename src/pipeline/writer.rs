//! Artifact persistence: one Markdown file per source, flattened naming.
//!
//! The destination is always `{output_root}/{stem}.md` — the source's
//! position in the input tree is not mirrored. Writes go through a
//! temp-file-plus-rename so a crash mid-write leaves at most a stale
//! `.md.tmp` for the one file in flight; sibling artifacts are never
//! corrupted. Pre-existing artifacts are overwritten unconditionally,
//! which is what makes re-runs idempotent.

use crate::error::FileError;
use crate::pipeline::enumerate::SourceFile;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persist the converted content for `source` under `output_root`.
///
/// Creates `output_root` (and any missing parents) on first use.
/// Returns the artifact path on success.
pub async fn write_artifact(
    source: &SourceFile,
    markdown: &str,
    output_root: &Path,
) -> Result<PathBuf, FileError> {
    let dest = output_root.join(format!("{}.md", source.stem));

    let write_failed = |e: std::io::Error| FileError::WriteFailed {
        path: dest.clone(),
        detail: e.to_string(),
    };

    tokio::fs::create_dir_all(output_root)
        .await
        .map_err(write_failed)?;

    let tmp_path = dest.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, markdown)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, &dest)
        .await
        .map_err(write_failed)?;

    debug!("Wrote {}", dest.display());
    Ok(dest)
}
