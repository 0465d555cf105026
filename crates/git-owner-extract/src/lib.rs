//! Record extraction from git history.
//!
//! Reads blame and log data for a single file using git2 and hands them to
//! the estimator as structured [`BlameRecord`]s and [`CommitRecord`]s via
//! the [`RecordSource`] trait.

pub mod blame;
pub mod log;
pub mod repo;

use std::path::{Path, PathBuf};

use git2::Repository;
use git_owner_core::{BlameRecord, CommitRecord, IdentityMode, OwnerError, RecordSource};

use crate::log::LogOptions;

/// A [`RecordSource`] backed by a local git repository.
///
/// Paths passed to the trait methods are resolved against `cwd` (relative)
/// or used as-is (absolute), then made relative to the work tree.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use git_owner_core::{IdentityMode, RecordSource};
/// use git_owner_extract::GitRecordSource;
///
/// let source = GitRecordSource::discover(Path::new("."), IdentityMode::Email).unwrap();
/// let commits = source.commit_records(Path::new("Cargo.toml")).unwrap();
/// println!("{} commits", commits.len());
/// ```
pub struct GitRecordSource {
    repo: Repository,
    cwd: PathBuf,
    identity: IdentityMode,
    log_options: LogOptions,
}

impl GitRecordSource {
    /// Open the repository enclosing `start`; relative file paths are later
    /// resolved against `start`.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerError::Git`] if `start` is not inside a work tree.
    pub fn discover(start: &Path, identity: IdentityMode) -> Result<Self, OwnerError> {
        let repo = repo::discover_repo(start)?;
        Ok(Self {
            repo,
            cwd: start.to_path_buf(),
            identity,
            log_options: LogOptions::default(),
        })
    }

    /// Replace the history walk options.
    pub fn with_log_options(mut self, options: LogOptions) -> Self {
        self.log_options = options;
        self
    }

    /// Root of the work tree.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    fn relative(&self, path: &Path) -> Result<String, OwnerError> {
        repo::repo_relative_path(&self.repo, &self.cwd, path)
    }
}

impl RecordSource for GitRecordSource {
    fn blame_records(&self, path: &Path) -> Result<Vec<BlameRecord>, OwnerError> {
        let rel = self.relative(path)?;
        blame::blame_records(&self.repo, &rel, self.identity)
    }

    fn commit_records(&self, path: &Path) -> Result<Vec<CommitRecord>, OwnerError> {
        let rel = self.relative(path)?;
        log::commit_records(&self.repo, &rel, self.identity, &self.log_options)
    }
}
