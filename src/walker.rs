use crate::errors::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// How to treat a traversal root that does not exist or is not a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootPolicy {
    /// Produce zero files.
    #[default]
    Ignore,
    /// Return [`Error::MissingRoot`].
    Fail,
}

/// Collects every candidate file under `root`, in a stable order.
///
/// Excluded directories are pruned before they are read, so nothing inside
/// them is ever visited. The root itself is never pruned. Unreadable
/// entries below the root are logged and skipped.
pub fn walk(
    root: &Path,
    exclude: &[String],
    extensions: &[String],
    policy: RootPolicy,
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return match policy {
            RootPolicy::Ignore => {
                tracing::debug!(root = %root.display(), "root is not a directory, nothing to do");
                Ok(Vec::new())
            }
            RootPolicy::Fail => Err(Error::MissingRoot(root.to_path_buf())),
        };
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, exclude));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_candidate(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn is_pruned(entry: &DirEntry, exclude: &[String]) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && is_excluded(entry.file_name(), exclude)
}

/// Exact match of a single path component against the exclusion set.
pub fn is_excluded(name: &OsStr, exclude: &[String]) -> bool {
    exclude.iter().any(|ex| name == OsStr::new(ex))
}

/// Case-sensitive suffix match of the file name against `extensions`.
///
/// Compares raw bytes, so names that are not valid UTF-8 still match.
pub fn is_candidate(path: &Path, extensions: &[String]) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.as_encoded_bytes();
            extensions.iter().any(|ext| name.ends_with(ext.as_bytes()))
        })
        .unwrap_or(false)
}
