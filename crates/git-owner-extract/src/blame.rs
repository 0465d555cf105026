//! Blame extraction via git2.
//!
//! Attributes every line of the file as committed at HEAD to the author who
//! last changed it. One record is emitted per blame hunk.

use std::path::Path;

use git2::{BlameOptions, ErrorCode, Repository};
use git_owner_core::{BlameRecord, IdentityMode, OwnerError};
use tracing::debug;

use crate::repo::identity;

/// Blame `rel_path` (repository-relative, `/`-separated) at HEAD.
///
/// A path that does not exist at HEAD (untracked or newly created file, or
/// an unborn branch) yields an empty sequence rather than an error; an
/// ownership estimate over it then fails with `NoHistory`.
///
/// # Errors
///
/// Returns [`OwnerError::Git`] for any other blame failure.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use git2::Repository;
/// use git_owner_core::IdentityMode;
/// use git_owner_extract::blame::blame_records;
///
/// let repo = Repository::discover(".").unwrap();
/// let records = blame_records(&repo, "src/main.rs", IdentityMode::Email).unwrap();
/// let lines: i64 = records.iter().map(|r| r.line_count).sum();
/// println!("{lines} lines blamed");
/// ```
pub fn blame_records(
    repo: &Repository,
    rel_path: &str,
    mode: IdentityMode,
) -> Result<Vec<BlameRecord>, OwnerError> {
    let mut opts = BlameOptions::new();
    let blame = match repo.blame_file(Path::new(rel_path), Some(&mut opts)) {
        Ok(blame) => blame,
        Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::UnbornBranch) => {
            debug!(path = rel_path, "not present at HEAD, no blame");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(OwnerError::Git(format!("failed to blame {rel_path}: {e}")));
        }
    };

    let mut records = Vec::with_capacity(blame.len());
    for hunk in blame.iter() {
        let lines = hunk.lines_in_hunk();
        if lines == 0 {
            continue;
        }
        let signature = hunk.final_signature();
        records.push(BlameRecord {
            author: identity(&signature, mode),
            line_count: lines as i64,
            commit_timestamp: Some(signature.when().seconds()),
        });
    }

    debug!(path = rel_path, hunks = records.len(), "blame extracted");
    Ok(records)
}
