use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for pkg-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Version parsing error: {0}")]
    Parse(String),

    #[error("No file matching {pattern} found")]
    NotFound { pattern: String },

    #[error("Too many files matching {pattern} found: {candidates:?}")]
    AmbiguousMatch {
        pattern: String,
        candidates: Vec<PathBuf>,
    },

    #[error(
        "No update when updating {} with {pattern} and replacement {replacement}",
        .path.display()
    )]
    NoChange {
        path: PathBuf,
        pattern: String,
        replacement: String,
    },

    #[error("Command `{command}` failed with {status}\n{output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("Can't run on dirty workdir {}", .0.display())]
    DirtyWorkdir(PathBuf),

    #[error("Branch is not up to date: {0}")]
    StaleBranch(String),

    #[error("Action aborted by user: {0}")]
    UserAbort(String),

    #[error("Unknown part to bump: {0}. Expected one of major, minor, patch")]
    InvalidUnit(String),

    #[error("Unknown command '{command}'. Possible commands are {expected}")]
    UnknownCommand { command: String, expected: String },

    #[error("Package metadata error: {0}")]
    AmbiguousMetadata(String),

    #[error("No gems need update")]
    NothingToUpdate,

    #[error("{0}: not implemented yet")]
    NotImplemented(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in pkg-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a version parsing error
    pub fn parse(msg: impl Into<String>) -> Self {
        ReleaseError::Parse(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a stale branch error
    pub fn stale(msg: impl Into<String>) -> Self {
        ReleaseError::StaleBranch(msg.into())
    }

    /// Create a user abort error
    pub fn aborted(msg: impl Into<String>) -> Self {
        ReleaseError::UserAbort(msg.into())
    }

    pub fn not_found(pattern: impl Into<String>) -> Self {
        ReleaseError::NotFound {
            pattern: pattern.into(),
        }
    }
}
