use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in the `recolor` application.
///
/// Per-file failures never surface through this type; they are recorded as
/// a [`FileOutcome`](crate::rewriter::FileOutcome) instead. Anything that
/// reaches the caller as an `Error` is fatal for the run.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred while parsing a YAML configuration file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// A replacement pair with an empty search string.
    #[error("Replacement #{index} has an empty `from` value")]
    InvalidReplacement { index: usize },

    /// The traversal root does not exist or is not a directory.
    #[error("Root directory not found: {}", .0.display())]
    MissingRoot(PathBuf),

    /// An error related to JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error related to persisting a temporary file.
    #[error("Tempfile error: {0}")]
    TempFile(#[from] tempfile::PersistError),
}

/// A convenient type alias for `Result<T, recolor::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
