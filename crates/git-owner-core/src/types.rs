use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lines of the current file attributed to one author.
///
/// Extraction emits one record per blame hunk, so an author usually appears
/// in several records. Counts are signed because records may come from
/// outside the process (JSON, other tools); the estimator rejects anything
/// below one instead of clamping.
///
/// # Examples
///
/// ```
/// use git_owner_core::BlameRecord;
///
/// let record = BlameRecord::new("alice@example.com", 42);
/// assert_eq!(record.line_count, 42);
/// assert!(record.commit_timestamp.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlameRecord {
    /// Author identity (email or name, see [`IdentityMode`]).
    pub author: String,
    /// Lines currently attributed to this author.
    pub line_count: i64,
    /// Unix timestamp of the attributing commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_timestamp: Option<i64>,
}

impl BlameRecord {
    /// Create a record without a commit timestamp.
    pub fn new(author: impl Into<String>, line_count: i64) -> Self {
        Self {
            author: author.into(),
            line_count,
            commit_timestamp: None,
        }
    }
}

/// One historical commit that touched the file.
///
/// # Examples
///
/// ```
/// use git_owner_core::CommitRecord;
///
/// let record = CommitRecord::new("bob@example.com", 1_700_000_000);
/// assert_eq!(record.author, "bob@example.com");
/// assert!(record.lines_added.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Author identity (email or name, see [`IdentityMode`]).
    pub author: String,
    /// Unix timestamp of the commit.
    pub timestamp: i64,
    /// Lines added to the file by this commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_added: Option<i64>,
    /// Lines removed from the file by this commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_removed: Option<i64>,
    /// Short commit hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl CommitRecord {
    /// Create a record with only author and timestamp.
    pub fn new(author: impl Into<String>, timestamp: i64) -> Self {
        Self {
            author: author.into(),
            timestamp,
            lines_added: None,
            lines_removed: None,
            hash: None,
        }
    }
}

/// How an author is identified in extracted records.
///
/// # Examples
///
/// ```
/// use git_owner_core::IdentityMode;
///
/// let mode: IdentityMode = "name".parse().unwrap();
/// assert_eq!(mode, IdentityMode::Name);
/// assert_eq!(IdentityMode::default(), IdentityMode::Email);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Author email address (default).
    #[default]
    Email,
    /// Author display name.
    Name,
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityMode::Email => write!(f, "email"),
            IdentityMode::Name => write!(f, "name"),
        }
    }
}

impl FromStr for IdentityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" | "mail" => Ok(IdentityMode::Email),
            "name" => Ok(IdentityMode::Name),
            _ => Err(format!("unknown identity mode: {s}")),
        }
    }
}

/// Which history signals feed the estimate.
///
/// A skipped signal is handed to the estimator as an empty sequence, so the
/// estimate falls back entirely to the other one.
///
/// # Examples
///
/// ```
/// use git_owner_core::Signals;
///
/// assert!(Signals::Both.uses_blame() && Signals::Both.uses_log());
/// assert!(!Signals::LogOnly.uses_blame());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Signals {
    /// Blame and log combined.
    #[default]
    Both,
    /// Only current line attribution.
    BlameOnly,
    /// Only commit history.
    LogOnly,
}

impl Signals {
    /// Whether blame records are requested.
    pub fn uses_blame(self) -> bool {
        matches!(self, Signals::Both | Signals::BlameOnly)
    }

    /// Whether commit records are requested.
    pub fn uses_log(self) -> bool {
        matches!(self, Signals::Both | Signals::LogOnly)
    }
}

/// Output format for command results.
///
/// # Examples
///
/// ```
/// use git_owner_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Ranked plain-text lines (default).
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
    /// GitHub-flavored Markdown.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("unknown output format: {s}")),
        }
    }
}
