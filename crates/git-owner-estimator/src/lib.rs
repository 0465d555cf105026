//! Ownership estimation from blame and log records.
//!
//! Turns the per-line attribution (blame) and commit history (log) of a
//! single file into a ranked list of likely owners. Everything here is a
//! pure function of in-memory records; reading those records from a
//! repository is the job of a [`RecordSource`].

pub mod estimate;
pub mod report;
mod shares;
pub mod validate;

use std::path::Path;

use git_owner_core::{OwnerError, RecordSource, Signals, WeightConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use estimate::{estimate_ownership, estimate_ownership_at};
pub use report::{AuthorScore, OwnershipReport};

/// Ownership report for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEstimate {
    /// The file as the caller named it.
    pub path: String,
    pub report: OwnershipReport,
}

/// Pull records for `path` from `source` and estimate its owner.
///
/// Only the signals selected by `signals` are read; a skipped signal is
/// passed on as an empty sequence so the estimate falls back to the other.
/// `reference_time` overrides the decay reference (see
/// [`estimate_ownership_at`]).
///
/// # Errors
///
/// Propagates errors from `source` and from [`estimate_ownership`].
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use git_owner_core::{
///     BlameRecord, CommitRecord, OwnerError, RecordSource, Signals, WeightConfig,
/// };
/// use git_owner_estimator::estimate_file;
///
/// struct Canned;
///
/// impl RecordSource for Canned {
///     fn blame_records(&self, _: &Path) -> Result<Vec<BlameRecord>, OwnerError> {
///         Ok(vec![BlameRecord::new("alice", 9), BlameRecord::new("bob", 1)])
///     }
///     fn commit_records(&self, _: &Path) -> Result<Vec<CommitRecord>, OwnerError> {
///         Ok(vec![CommitRecord::new("bob", 2), CommitRecord::new("bob", 1)])
///     }
/// }
///
/// let combined = estimate_file(
///     &Canned, Path::new("lib.rs"), Signals::Both, &WeightConfig::default(), None,
/// ).unwrap();
/// assert_eq!(combined.report.estimated_owner, "alice");
///
/// let log_only = estimate_file(
///     &Canned, Path::new("lib.rs"), Signals::LogOnly, &WeightConfig::default(), None,
/// ).unwrap();
/// assert_eq!(log_only.report.estimated_owner, "bob");
/// ```
pub fn estimate_file<S: RecordSource + ?Sized>(
    source: &S,
    path: &Path,
    signals: Signals,
    config: &WeightConfig,
    reference_time: Option<i64>,
) -> Result<FileEstimate, OwnerError> {
    let blame = if signals.uses_blame() {
        source.blame_records(path)?
    } else {
        Vec::new()
    };
    let commits = if signals.uses_log() {
        source.commit_records(path)?
    } else {
        Vec::new()
    };
    debug!(
        path = %path.display(),
        blame_records = blame.len(),
        commit_records = commits.len(),
        "records extracted"
    );

    let report = match reference_time {
        Some(at) => estimate_ownership_at(&blame, &commits, config, at)?,
        None => estimate_ownership(&blame, &commits, config)?,
    };

    Ok(FileEstimate {
        path: path.display().to_string(),
        report,
    })
}
