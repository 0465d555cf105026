use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which record sequence a malformed record came from.
///
/// # Examples
///
/// ```
/// use git_owner_core::RecordKind;
///
/// assert_eq!(RecordKind::Blame.to_string(), "blame");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// A [`BlameRecord`](crate::BlameRecord).
    Blame,
    /// A [`CommitRecord`](crate::CommitRecord).
    Commit,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Blame => write!(f, "blame"),
            RecordKind::Commit => write!(f, "commit"),
        }
    }
}

/// Errors that can occur while estimating file ownership.
///
/// `NoHistory` and `InvalidRecord` are the estimator's own failures and are
/// kept as distinct variants so callers can tell "no data" apart from
/// "malformed data". The remaining variants come from extraction and
/// configuration. Library crates use this type directly; the binary renders
/// it through `miette`.
///
/// # Examples
///
/// ```
/// use git_owner_core::{OwnerError, RecordKind};
///
/// let err = OwnerError::InvalidRecord {
///     kind: RecordKind::Blame,
///     index: 2,
///     reason: "author is empty".into(),
/// };
/// assert!(err.is_invalid_record());
/// assert!(err.to_string().contains("blame record #2"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum OwnerError {
    /// Neither blame nor log produced any usable data.
    #[error("no history: the file has no blame lines and no commits")]
    #[diagnostic(
        code(git_owner::no_history),
        help("the file may be untracked or newly created; commit it first")
    )]
    NoHistory,

    /// A single input record is malformed.
    #[error("invalid {kind} record #{index}: {reason}")]
    #[diagnostic(code(git_owner::invalid_record))]
    InvalidRecord {
        /// Sequence the record belongs to.
        kind: RecordKind,
        /// Zero-based position in its sequence.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(git_owner::config))]
    Config(String),

    /// Git operation failure.
    #[error("git error: {0}")]
    #[diagnostic(code(git_owner::git))]
    Git(String),

    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(git_owner::io))]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(git_owner::serialization))]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(git_owner::toml))]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(code(git_owner::file_not_found))]
    FileNotFound(PathBuf),
}

impl OwnerError {
    /// Whether this is the "no data at all" failure.
    pub fn is_no_history(&self) -> bool {
        matches!(self, OwnerError::NoHistory)
    }

    /// Whether this is the "malformed record" failure.
    pub fn is_invalid_record(&self) -> bool {
        matches!(self, OwnerError::InvalidRecord { .. })
    }
}
