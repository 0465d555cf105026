//! Commit history extraction via git2.
//!
//! Walks history from HEAD, newest first, and keeps the commits that changed
//! the file. Renames are followed backwards: once the commit that moved
//! `old` to the tracked path is seen, older commits are matched against
//! `old`.

use std::path::Path;

use git2::{Commit, Delta, DiffFindOptions, DiffOptions, Oid, Patch, Repository, Sort, Tree};
use git_owner_core::{CommitRecord, IdentityMode, OwnerError};
use tracing::debug;

use crate::repo::identity;

/// Options for history extraction.
///
/// # Examples
///
/// ```
/// use git_owner_extract::log::LogOptions;
///
/// let opts = LogOptions::default();
/// assert!(opts.follow_renames);
/// assert!(opts.max_commits.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Keep tracking the file across renames (default: true).
    pub follow_renames: bool,
    /// Stop after this many matching commits (default: unlimited).
    pub max_commits: Option<usize>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            follow_renames: true,
            max_commits: None,
        }
    }
}

/// Commits that touched `rel_path`, newest first.
///
/// A commit counts when the file's content differs from its first parent
/// (root commits compare against nothing). Merge commits count only when the
/// file differs from every parent.
///
/// # Errors
///
/// Returns [`OwnerError::Git`] if the history cannot be walked. An unborn
/// HEAD (no commits yet) yields an empty sequence.
///
/// # Examples
///
/// ```no_run
/// use git2::Repository;
/// use git_owner_core::IdentityMode;
/// use git_owner_extract::log::{commit_records, LogOptions};
///
/// let repo = Repository::discover(".").unwrap();
/// let commits =
///     commit_records(&repo, "src/main.rs", IdentityMode::Email, &LogOptions::default()).unwrap();
/// for c in &commits {
///     println!("{} {}", c.timestamp, c.author);
/// }
/// ```
pub fn commit_records(
    repo: &Repository,
    rel_path: &str,
    mode: IdentityMode,
    options: &LogOptions,
) -> Result<Vec<CommitRecord>, OwnerError> {
    let mut revwalk = repo
        .revwalk()
        .map_err(|e| OwnerError::Git(format!("failed to create revwalk: {e}")))?;
    revwalk
        .set_sorting(Sort::TIME)
        .map_err(|e| OwnerError::Git(format!("failed to sort revwalk: {e}")))?;

    if let Err(e) = revwalk.push_head() {
        if matches!(e.code(), git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound) {
            debug!("HEAD is unborn, no history");
            return Ok(Vec::new());
        }
        return Err(OwnerError::Git(format!("failed to push HEAD: {e}")));
    }

    let mut tracked = rel_path.to_string();
    let mut records = Vec::new();

    for oid_result in revwalk {
        let oid = oid_result.map_err(|e| OwnerError::Git(format!("revwalk error: {e}")))?;
        let commit = repo
            .find_commit(oid)
            .map_err(|e| OwnerError::Git(format!("failed to find commit: {e}")))?;
        let tree = commit_tree(&commit)?;
        let parents = parent_trees(&commit)?;

        let current = blob_at(&tree, &tracked);
        let touched = if parents.is_empty() {
            current.is_some()
        } else {
            parents.iter().all(|p| blob_at(p, &tracked) != current)
        };
        if !touched {
            continue;
        }

        let first_parent = parents.first();
        let (lines_added, lines_removed) = line_stats(repo, first_parent, &tree, &tracked)?;

        let author = commit.author();
        let hash = oid.to_string();
        let short = &hash[..hash.len().min(8)];
        records.push(CommitRecord {
            author: identity(&author, mode),
            timestamp: author.when().seconds(),
            lines_added: Some(lines_added as i64),
            lines_removed: Some(lines_removed as i64),
            hash: Some(short.to_string()),
        });

        if options.max_commits.is_some_and(|max| records.len() >= max) {
            break;
        }

        // The file appeared in this commit; it may have come from elsewhere.
        let appeared = current.is_some()
            && first_parent.is_some_and(|p| blob_at(p, &tracked).is_none());
        if options.follow_renames && appeared {
            if let Some(parent) = first_parent {
                if let Some(old) = rename_source(repo, parent, &tree, &tracked)? {
                    debug!(from = %old, to = %tracked, commit = short, "following rename");
                    tracked = old;
                }
            }
        }
    }

    debug!(path = rel_path, commits = records.len(), "log extracted");
    Ok(records)
}

fn commit_tree<'r>(commit: &Commit<'r>) -> Result<Tree<'r>, OwnerError> {
    commit
        .tree()
        .map_err(|e| OwnerError::Git(format!("failed to get commit tree: {e}")))
}

fn parent_trees<'r>(commit: &Commit<'r>) -> Result<Vec<Tree<'r>>, OwnerError> {
    commit
        .parents()
        .map(|parent| {
            parent
                .tree()
                .map_err(|e| OwnerError::Git(format!("failed to get parent tree: {e}")))
        })
        .collect()
}

/// Blob id of `path` in `tree`, `None` when absent.
fn blob_at(tree: &Tree<'_>, path: &str) -> Option<Oid> {
    tree.get_path(Path::new(path)).ok().map(|entry| entry.id())
}

/// Lines added and removed in `path` between `parent` and `tree`.
fn line_stats(
    repo: &Repository,
    parent: Option<&Tree<'_>>,
    tree: &Tree<'_>,
    path: &str,
) -> Result<(usize, usize), OwnerError> {
    let mut diff_opts = DiffOptions::new();
    diff_opts.pathspec(path).disable_pathspec_match(true);
    let diff = repo
        .diff_tree_to_tree(parent, Some(tree), Some(&mut diff_opts))
        .map_err(|e| OwnerError::Git(format!("failed to compute diff: {e}")))?;

    let mut added = 0;
    let mut removed = 0;
    for idx in 0..diff.deltas().len() {
        let patch = Patch::from_diff(&diff, idx)
            .map_err(|e| OwnerError::Git(format!("failed to build patch: {e}")))?;
        if let Some(patch) = patch {
            let (_, additions, deletions) = patch
                .line_stats()
                .map_err(|e| OwnerError::Git(format!("failed to count lines: {e}")))?;
            added += additions;
            removed += deletions;
        }
    }
    Ok((added, removed))
}

/// Path that was renamed to `path` between `parent` and `tree`, if any.
fn rename_source(
    repo: &Repository,
    parent: &Tree<'_>,
    tree: &Tree<'_>,
    path: &str,
) -> Result<Option<String>, OwnerError> {
    let mut diff = repo
        .diff_tree_to_tree(Some(parent), Some(tree), None)
        .map_err(|e| OwnerError::Git(format!("failed to compute diff: {e}")))?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(|e| OwnerError::Git(format!("failed to find renames: {e}")))?;

    let source = diff
        .deltas()
        .filter(|delta| delta.status() == Delta::Renamed)
        .find(|delta| {
            delta
                .new_file()
                .path()
                .is_some_and(|p| p == Path::new(path))
        })
        .and_then(|delta| delta.old_file().path().map(path_to_slash));

    Ok(source)
}

fn path_to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
