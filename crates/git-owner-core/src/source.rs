use std::path::Path;

use crate::error::OwnerError;
use crate::types::{BlameRecord, CommitRecord};

/// Supplies authorship records for a single file.
///
/// The estimator never talks to version control itself; whatever reads
/// blame and log output implements this trait and is handed in by the
/// caller.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use git_owner_core::{BlameRecord, CommitRecord, OwnerError, RecordSource};
///
/// struct Fixed;
///
/// impl RecordSource for Fixed {
///     fn blame_records(&self, _path: &Path) -> Result<Vec<BlameRecord>, OwnerError> {
///         Ok(vec![BlameRecord::new("alice", 10)])
///     }
///
///     fn commit_records(&self, _path: &Path) -> Result<Vec<CommitRecord>, OwnerError> {
///         Ok(vec![CommitRecord::new("alice", 0)])
///     }
/// }
///
/// let blame = Fixed.blame_records(Path::new("main.rs")).unwrap();
/// assert_eq!(blame[0].line_count, 10);
/// ```
pub trait RecordSource {
    /// Per-line attribution of the file's current content.
    ///
    /// # Errors
    ///
    /// Implementation-specific; git-backed sources return
    /// [`OwnerError::Git`].
    fn blame_records(&self, path: &Path) -> Result<Vec<BlameRecord>, OwnerError>;

    /// Commits that touched the file, newest first.
    ///
    /// # Errors
    ///
    /// Implementation-specific; git-backed sources return
    /// [`OwnerError::Git`].
    fn commit_records(&self, path: &Path) -> Result<Vec<CommitRecord>, OwnerError>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn blame_records(&self, path: &Path) -> Result<Vec<BlameRecord>, OwnerError> {
        (**self).blame_records(path)
    }

    fn commit_records(&self, path: &Path) -> Result<Vec<CommitRecord>, OwnerError> {
        (**self).commit_records(path)
    }
}
