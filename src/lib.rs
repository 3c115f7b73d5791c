//! `recolor` is a library for rewriting literal color codes across a source tree.
//!
//! It provides the core logic for the `recolor` command-line tool but can also be used
//! as a standalone library. The main components are:
//!
//! - `palette`: Ordered literal replacement tables and the built-in presets.
//! - `walker`: Directory traversal with extension filtering and directory pruning.
//! - `Rewriter`: Applies a table to every candidate file, writing back only real changes.
//! - `config`: Loads YAML configuration and resolves it against CLI flags.
//! - `report`: Console and JSON output for a run.
//! - `commands`: Runs a parsed command line and maps it to an exit status.
//!
//! Per-file failures never abort a run. They are recorded as a `FileOutcome`
//! and aggregated into a `RunReport`, which callers can inspect or ignore.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod palette;
pub mod report;
pub mod rewriter;
pub mod walker;

// Re-export main types for easier access by library users.
pub use config::{RewriteOptions, Settings};
pub use errors::{Error, Result};
pub use palette::{Preset, Replacement, ReplacementTable};
pub use report::{OutputFormat, Reporter};
pub use commands::RunStatus;
pub use rewriter::{restore_backups, run, FileOutcome, RunReport, Rewriter, UndoStats};
pub use walker::RootPolicy;
