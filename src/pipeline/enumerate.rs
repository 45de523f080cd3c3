//! Source discovery: walk the input root and produce an ordered file list.
//!
//! ## Why materialise before truncating?
//!
//! `walkdir` yields entries in directory order, which differs between
//! file systems and platforms. The contract here is determinism: the full
//! tree is collected, sorted by full path, and only then cut down to the
//! optional limit — so `--limit 20` always means "the first 20 in sorted
//! order", not "the first 20 the kernel happened to return".

use crate::error::MillError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One discovered input document. Immutable after discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path as walked from the input root.
    pub path: PathBuf,
    /// Base name without the extension; determines the artifact name.
    pub stem: String,
}

impl SourceFile {
    fn from_path(path: PathBuf) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, stem }
    }
}

/// Recursively enumerate matching files under `root`.
///
/// Files are matched on `extension` exactly as given (no case
/// normalisation), sorted by full path, then truncated to `limit` if set.
///
/// # Errors
/// Fatal [`MillError::InputDirNotFound`] / [`MillError::NotADirectory`]
/// when the root is unusable — the caller must not start any conversion
/// work. Unreadable entries below the root are logged at `warn` and
/// skipped; they never become [`SourceFile`]s.
pub fn enumerate_sources(
    root: &Path,
    extension: &str,
    limit: Option<usize>,
) -> Result<Vec<SourceFile>, MillError> {
    if !root.exists() {
        return Err(MillError::InputDirNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(MillError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    if let Some(n) = limit {
        files.truncate(n);
    }

    let sources: Vec<SourceFile> = files.into_iter().map(SourceFile::from_path).collect();
    debug!(
        "Enumerated {} '.{}' files under {}",
        sources.len(),
        extension,
        root.display()
    );

    warn_on_stem_collisions(&sources);
    Ok(sources)
}

/// Flattened output naming means two sources with the same stem write to
/// the same artifact path. The later one (in sorted order) wins; make the
/// overwrite visible in the run log.
fn warn_on_stem_collisions(sources: &[SourceFile]) {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for s in sources {
        if let Some(first) = seen.insert(s.stem.as_str(), s.path.as_path()) {
            warn!(
                "Stem collision: '{}' and '{}' both produce '{}.md'; the later file overwrites the earlier artifact",
                first.display(),
                s.path.display(),
                s.stem
            );
        }
    }
}
