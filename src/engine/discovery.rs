//! Candidate file enumeration.
//!
//! Walks each root below the base directory and keeps regular files whose
//! extension is on the allow-list. Entries are visited in file name order so
//! repeated runs over the same tree produce the same findings in the same
//! order.

use crate::LintError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file a check is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Path used to open the file
    pub path: PathBuf,
    /// Path shown in diagnostics (relative to the base directory)
    pub display: String,
    /// Path relative to the root the file was found under
    pub relative: PathBuf,
}

impl Target {
    /// A target that was named directly rather than discovered.
    pub fn file(path: &Path) -> Self {
        Target {
            path: path.to_path_buf(),
            display: path.display().to_string(),
            relative: path.file_name().map(PathBuf::from).unwrap_or_default(),
        }
    }
}

/// Result of walking a set of roots.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub targets: Vec<Target>,
    /// Roots that do not exist below the base directory
    pub missing_roots: Vec<String>,
}

fn extension_allowed(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    match path.extension().and_then(OsStr::to_str) {
        Some(ext) => extensions.iter().any(|e| e.trim_start_matches('.') == ext),
        None => false,
    }
}

/// Enumerate files below `roots` (relative to `base_dir`) matching `extensions`.
///
/// An empty extension list accepts every file. Missing roots are reported
/// in [`Discovery::missing_roots`] rather than treated as errors.
pub fn discover(base_dir: &Path, roots: &[String], extensions: &[String]) -> Result<Discovery, LintError> {
    let mut discovery = Discovery::default();

    for root in roots {
        let root_dir = base_dir.join(root);
        if !root_dir.is_dir() {
            tracing::warn!(root = %root, base = %base_dir.display(), "root directory not found");
            discovery.missing_roots.push(root.clone());
            continue;
        }

        let before = discovery.targets.len();
        for entry in WalkDir::new(&root_dir).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }
            if !extension_allowed(entry.path(), extensions) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&root_dir)
                .map_err(|_| LintError::OutsideRoot {
                    path: entry.path().to_path_buf(),
                    root: root_dir.clone(),
                })?
                .to_path_buf();

            discovery.targets.push(Target {
                path: entry.path().to_path_buf(),
                display: Path::new(root).join(&relative).display().to_string(),
                relative,
            });
        }

        tracing::debug!(root = %root, files = discovery.targets.len() - before, "walked root");
    }

    Ok(discovery)
}
