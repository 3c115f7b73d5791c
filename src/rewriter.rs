use crate::config::{RewriteOptions, Settings};
use crate::errors::Result;
use crate::palette::{Replacement, ReplacementTable};
use crate::walker::{self, RootPolicy};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What happened to a single candidate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The content changed and was written (or would be, in a dry run).
    Updated { substitutions: usize },
    /// None of the search strings produced a different result.
    Unchanged,
    /// The file could not be opened, read, or decoded as UTF-8.
    SkippedUnreadable { reason: String },
    /// The new content could not be written back.
    SkippedUnwritable { reason: String },
}

impl FileOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, FileOutcome::Updated { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            FileOutcome::SkippedUnreadable { .. } | FileOutcome::SkippedUnwritable { .. }
        )
    }
}

/// A processed file and its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Everything a run did, in traversal order.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub dry_run: bool,
    #[serde(skip)]
    strict: bool,
}

impl RunReport {
    /// Paths whose content changed, in the order they were visited.
    pub fn changed_paths(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|f| f.outcome.is_updated())
            .map(|f| f.path.clone())
            .collect()
    }

    pub fn scanned(&self) -> usize {
        self.files.len()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| o.is_updated())
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unchanged))
    }

    pub fn unreadable(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::SkippedUnreadable { .. }))
    }

    pub fn unwritable(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::SkippedUnwritable { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| o.is_skipped())
    }

    pub fn substitutions(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::Updated { substitutions } => substitutions,
                _ => 0,
            })
            .sum()
    }

    /// `true` if an intended change was lost, or (in strict mode) a file could not be read.
    pub fn has_failures(&self) -> bool {
        self.unwritable() > 0 || (self.strict && self.unreadable() > 0)
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Rewrites files under a directory tree according to a [`ReplacementTable`].
pub struct Rewriter {
    settings: Settings,
}

impl Rewriter {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Processes a single file.
    ///
    /// The file is only opened for writing when the rewritten content
    /// differs from what was read. Failures are returned as outcomes,
    /// never as errors.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping unreadable file");
                return FileOutcome::SkippedUnreadable {
                    reason: e.to_string(),
                };
            }
        };

        let applied = self.settings.table.apply(&content);
        if !applied.changed(&content) {
            return FileOutcome::Unchanged;
        }

        if !self.settings.options.dry_run {
            if let Err(e) = write_back(path, applied.content.as_bytes(), &self.settings.options) {
                tracing::debug!(path = %path.display(), error = %e, "skipping unwritable file");
                return FileOutcome::SkippedUnwritable {
                    reason: e.to_string(),
                };
            }
        }

        FileOutcome::Updated {
            substitutions: applied.substitutions,
        }
    }

    /// Walks `root` and processes every candidate file.
    ///
    /// `on_outcome` is called as each file finishes, so callers can stream
    /// progress. Only traversal-level failures (a missing root under
    /// [`RootPolicy::Fail`](crate::walker::RootPolicy::Fail)) are returned as errors.
    pub fn run<F>(&self, root: &Path, mut on_outcome: F) -> Result<RunReport>
    where
        F: FnMut(&Path, &FileOutcome),
    {
        let options = &self.settings.options;
        let files = walker::walk(
            root,
            &self.settings.exclude,
            &self.settings.extensions,
            options.root_policy,
        )?;
        tracing::info!(
            root = %root.display(),
            candidates = files.len(),
            dry_run = options.dry_run,
            "starting rewrite"
        );

        let mut report = RunReport {
            files: Vec::with_capacity(files.len()),
            dry_run: options.dry_run,
            strict: options.strict,
        };

        for path in files {
            let outcome = self.process_file(&path);
            on_outcome(&path, &outcome);
            report.files.push(FileReport { path, outcome });
        }

        tracing::info!(
            scanned = report.scanned(),
            updated = report.updated(),
            skipped = report.skipped(),
            "rewrite finished"
        );
        Ok(report)
    }
}

/// Rewrites every candidate under `root` with default options and returns the changed paths.
pub fn run(
    root: &Path,
    exclude: &[String],
    extensions: &[String],
    replacements: Vec<Replacement>,
) -> Result<Vec<PathBuf>> {
    let settings = Settings {
        table: ReplacementTable::new(replacements)?,
        extensions: crate::config::normalize_extensions(extensions),
        exclude: exclude.to_vec(),
        options: RewriteOptions::default(),
    };
    let report = Rewriter::new(settings).run(root, |_, _| {})?;
    Ok(report.changed_paths())
}

/// Statistics from restoring `.bak` files.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UndoStats {
    /// The number of backup files found.
    pub found: usize,
    /// The number of files successfully restored from backups.
    pub restored: usize,
}

/// Restores every `<file>.bak` under `root` over `<file>`.
///
/// This is the exact inverse of a `--backup` run, unlike the `revert`
/// preset. Excluded directories are pruned the same way a rewrite prunes
/// them. A backup that cannot be restored is logged and left in place.
pub fn restore_backups<F>(
    root: &Path,
    exclude: &[String],
    policy: RootPolicy,
    keep_backups: bool,
    mut on_restore: F,
) -> Result<UndoStats>
where
    F: FnMut(&Path),
{
    let backups = walker::walk(root, exclude, &[".bak".to_string()], policy)?;
    let mut stats = UndoStats {
        found: backups.len(),
        restored: 0,
    };

    for backup in backups {
        let original = backup.with_extension("");
        let restored = if keep_backups {
            fs::copy(&backup, &original).map(|_| ())
        } else {
            fs::rename(&backup, &original)
        };
        match restored {
            Ok(()) => {
                stats.restored += 1;
                on_restore(&original);
            }
            Err(e) => {
                tracing::debug!(backup = %backup.display(), error = %e, "could not restore backup");
            }
        }
    }

    Ok(stats)
}

/// `<path>.bak`, built on the raw path so non-UTF-8 names survive.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Replaces `path` with `content` atomically, keeping its permissions.
///
/// With `backup` set, an existing `.bak` is kept as-is so it always holds
/// the content from before the first rewrite.
fn write_back(path: &Path, content: &[u8], options: &RewriteOptions) -> Result<()> {
    let perms = fs::metadata(path)?.permissions();
    if perms.readonly() {
        return Err(format!("{} is read-only", path.display()).into());
    }

    if options.backup {
        let backup = backup_path(path);
        if backup.exists() {
            tracing::debug!(backup = %backup.display(), "keeping existing backup");
        } else {
            fs::copy(path, &backup)?;
        }
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => {
            return Err(format!("Could not get parent directory for {}", path.display()).into());
        }
    };

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;
    fs::set_permissions(temp_file.path(), perms)?;
    temp_file.persist(path)?;

    Ok(())
}
