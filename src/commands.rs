//! Executes a parsed command line and decides the process exit status.

use crate::cli::Args;
use crate::config::{ConfigLoader, RewriteOptions, Settings};
use crate::errors::Result;
use crate::report::Reporter;
use crate::rewriter::{self, Rewriter};
use crate::walker::RootPolicy;
use std::env;
use std::io::Write;

/// Exit status for a fatal error (bad config, missing root under `--fail-on-missing-root`).
pub const EXIT_FATAL: i32 = 1;

/// Exit status when `--strict` is set and at least one file failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 2;

/// How a completed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Strict mode saw a file that could not be read or written.
    PartialFailure,
}

impl RunStatus {
    pub fn code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::PartialFailure => EXIT_PARTIAL_FAILURE,
        }
    }
}

/// Maps the result of [`execute`] to a process exit status.
pub fn exit_code(result: &Result<RunStatus>) -> i32 {
    match result {
        Ok(status) => status.code(),
        Err(_) => EXIT_FATAL,
    }
}

/// Runs the command described by `args`, writing normal output to `out`
/// and strict-mode diagnostics to `err`.
pub fn execute<W: Write, E: Write>(args: Args, mut out: W, err: E) -> Result<RunStatus> {
    let root = match args.root {
        Some(root) => root,
        None => env::current_dir()?,
    };

    let config = match args.config {
        Some(cfg_path) => {
            let resolved_path = ConfigLoader::find_config(&cfg_path, &root)?;
            tracing::info!(path = %resolved_path.display(), "using config file");
            Some(ConfigLoader::load(&resolved_path)?)
        }
        None => None,
    };

    let options = RewriteOptions {
        dry_run: args.dry_run,
        backup: args.backup,
        strict: args.strict,
        root_policy: if args.fail_on_missing_root {
            RootPolicy::Fail
        } else {
            RootPolicy::Ignore
        },
    };
    let settings = Settings::resolve(args.preset, config, args.extensions, args.exclude, options)?;

    if args.undo {
        let mut write_error = None;
        let stats = rewriter::restore_backups(
            &root,
            &settings.exclude,
            options.root_policy,
            args.keep_backups,
            |path| {
                if write_error.is_none() {
                    if let Err(e) = writeln!(out, "Restored: {}", path.display()) {
                        write_error = Some(e);
                    }
                }
            },
        )?;
        if let Some(e) = write_error {
            return Err(e.into());
        }
        if args.summary {
            writeln!(out, "\nBackups found: {}, restored: {}", stats.found, stats.restored)?;
        }
        out.flush()?;

        return Ok(if args.strict && stats.restored < stats.found {
            RunStatus::PartialFailure
        } else {
            RunStatus::Success
        });
    }

    let rewriter = Rewriter::new(settings);
    let mut reporter = Reporter::new(args.format, args.summary, args.strict, out, err);

    let mut write_error = None;
    let report = rewriter.run(&root, |path, outcome| {
        if write_error.is_none() {
            if let Err(e) = reporter.file(path, outcome, args.dry_run) {
                write_error = Some(e);
            }
        }
    })?;
    if let Some(e) = write_error {
        return Err(e);
    }
    reporter.finish(&report)?;

    Ok(if args.strict && report.has_failures() {
        RunStatus::PartialFailure
    } else {
        RunStatus::Success
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsString;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn args(root: &Path, extra: &[&str]) -> Args {
        let mut argv: Vec<OsString> = vec!["recolor".into(), root.as_os_str().to_owned()];
        argv.extend(extra.iter().map(OsString::from));
        Args::try_parse_from(argv).unwrap()
    }

    fn run(args: Args) -> (Result<RunStatus>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = execute(args, &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn tree_with_read_only_file() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locked.css");
        fs::write(&path, "color: #1243B2;").unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();
        temp_dir
    }

    #[test]
    fn test_default_mode_exits_zero_despite_write_failure() {
        let temp_dir = tree_with_read_only_file();

        let (result, out, err) = run(args(temp_dir.path(), &[]));

        assert_eq!(exit_code(&result), 0);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_strict_mode_exits_two_on_write_failure() {
        let temp_dir = tree_with_read_only_file();

        let (result, out, err) = run(args(temp_dir.path(), &["--strict"]));

        assert_eq!(result.as_ref().ok(), Some(&RunStatus::PartialFailure));
        assert_eq!(exit_code(&result), EXIT_PARTIAL_FAILURE);
        assert!(out.is_empty());
        assert!(err.starts_with("Skipped (unwritable): "));
    }

    #[test]
    fn test_strict_mode_exits_zero_when_everything_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.css");
        fs::write(&path, "color: #1243B2;").unwrap();

        let (result, out, _) = run(args(temp_dir.path(), &["--strict"]));

        assert_eq!(exit_code(&result), 0);
        assert_eq!(out, format!("Updated: {}\n", path.display()));
    }

    #[test]
    fn test_missing_config_exits_one() {
        let temp_dir = TempDir::new().unwrap();

        let (result, _, _) = run(args(
            temp_dir.path(),
            &["--config", "recolor-missing-config.yaml"],
        ));

        assert_eq!(exit_code(&result), EXIT_FATAL);
    }

    #[test]
    fn test_malformed_config_exits_one() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("bad.yaml");
        fs::write(&config, "replacements: [unterminated").unwrap();

        let (result, _, _) = run(args(
            temp_dir.path(),
            &["--config", config.to_str().unwrap()],
        ));

        assert_eq!(exit_code(&result), EXIT_FATAL);
    }

    #[test]
    fn test_missing_root_exit_depends_on_policy() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");

        let (lenient, _, _) = run(args(&missing, &[]));
        assert_eq!(exit_code(&lenient), 0);

        let (strict, _, _) = run(args(&missing, &["--fail-on-missing-root"]));
        assert_eq!(exit_code(&strict), EXIT_FATAL);
    }

    #[test]
    fn test_undo_restores_backups() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("theme.css");
        let original = "a { color: #1243B2; } b { color: #10367D; }";
        fs::write(&path, original).unwrap();

        let (result, _, _) = run(args(temp_dir.path(), &["--backup"]));
        assert_eq!(exit_code(&result), 0);
        assert_ne!(fs::read_to_string(&path).unwrap(), original);

        let (result, out, _) = run(args(temp_dir.path(), &["--undo"]));
        assert_eq!(exit_code(&result), 0);
        assert_eq!(out, format!("Restored: {}\n", path.display()));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }
}
