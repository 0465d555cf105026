//! Fail-fast record validation.
//!
//! Malformed records are rejected, never repaired: a clamped count would
//! silently shift ownership.

use git_owner_core::{BlameRecord, CommitRecord, OwnerError, RecordKind};

/// Check every blame record.
///
/// # Errors
///
/// Returns [`OwnerError::InvalidRecord`] for the first record with an empty
/// author or a line count below one.
///
/// # Examples
///
/// ```
/// use git_owner_core::BlameRecord;
/// use git_owner_estimator::validate::validate_blame;
///
/// assert!(validate_blame(&[BlameRecord::new("alice", 3)]).is_ok());
/// assert!(validate_blame(&[BlameRecord::new("", 3)]).is_err());
/// ```
pub fn validate_blame(records: &[BlameRecord]) -> Result<(), OwnerError> {
    for (index, record) in records.iter().enumerate() {
        check_author(RecordKind::Blame, index, &record.author)?;
        if record.line_count < 1 {
            return Err(invalid(
                RecordKind::Blame,
                index,
                format!("line count must be positive, got {}", record.line_count),
            ));
        }
    }
    Ok(())
}

/// Check every commit record.
///
/// # Errors
///
/// Returns [`OwnerError::InvalidRecord`] for the first record with an empty
/// author or a negative line delta.
///
/// # Examples
///
/// ```
/// use git_owner_core::CommitRecord;
/// use git_owner_estimator::validate::validate_commits;
///
/// let mut record = CommitRecord::new("bob", 1_700_000_000);
/// assert!(validate_commits(&[record.clone()]).is_ok());
///
/// record.lines_removed = Some(-1);
/// assert!(validate_commits(&[record]).is_err());
/// ```
pub fn validate_commits(records: &[CommitRecord]) -> Result<(), OwnerError> {
    for (index, record) in records.iter().enumerate() {
        check_author(RecordKind::Commit, index, &record.author)?;
        if let Some(added) = record.lines_added.filter(|n| *n < 0) {
            return Err(invalid(
                RecordKind::Commit,
                index,
                format!("lines added must not be negative, got {added}"),
            ));
        }
        if let Some(removed) = record.lines_removed.filter(|n| *n < 0) {
            return Err(invalid(
                RecordKind::Commit,
                index,
                format!("lines removed must not be negative, got {removed}"),
            ));
        }
    }
    Ok(())
}

fn check_author(kind: RecordKind, index: usize, author: &str) -> Result<(), OwnerError> {
    if author.trim().is_empty() {
        return Err(invalid(kind, index, "author is empty".into()));
    }
    Ok(())
}

fn invalid(kind: RecordKind, index: usize, reason: String) -> OwnerError {
    OwnerError::InvalidRecord {
        kind,
        index,
        reason,
    }
}
