//! Repository discovery and path resolution.

use std::path::{Component, Path, PathBuf};

use git2::{Repository, Signature};
use git_owner_core::{IdentityMode, OwnerError};

/// Open the repository containing `start`.
///
/// # Errors
///
/// Returns [`OwnerError::Git`] if `start` is not inside a work tree.
pub fn discover_repo(start: &Path) -> Result<Repository, OwnerError> {
    let repo = Repository::discover(start).map_err(|e| {
        OwnerError::Git(format!(
            "not a git repository (or any parent): {}: {e}",
            start.display()
        ))
    })?;
    if repo.is_bare() {
        return Err(OwnerError::Git(
            "bare repositories have no work tree to resolve files against".into(),
        ));
    }
    Ok(repo)
}

/// Turn a user-supplied path into a `/`-separated path relative to the
/// repository work tree.
///
/// Relative paths are resolved against `cwd`. The file need not exist on
/// disk (it may only live in history), but its parent directory must.
///
/// # Errors
///
/// Returns [`OwnerError::FileNotFound`] if the parent directory does not
/// exist, or [`OwnerError::Git`] if the path lies outside the work tree.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use git_owner_extract::repo::{discover_repo, repo_relative_path};
///
/// let repo = discover_repo(Path::new(".")).unwrap();
/// let cwd = std::env::current_dir().unwrap();
/// let rel = repo_relative_path(&repo, &cwd, Path::new("src/main.rs")).unwrap();
/// println!("{rel}");
/// ```
pub fn repo_relative_path(repo: &Repository, cwd: &Path, path: &Path) -> Result<String, OwnerError> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| OwnerError::Git("repository has no work tree".into()))?;
    let workdir = workdir.canonicalize()?;

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let absolute = canonicalize_lenient(&absolute)?;

    let relative = absolute.strip_prefix(&workdir).map_err(|_| {
        OwnerError::Git(format!(
            "{} is outside the repository at {}",
            path.display(),
            workdir.display()
        ))
    })?;

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return Err(OwnerError::Git(format!(
            "{} is the repository root, not a file",
            path.display()
        )));
    }
    Ok(parts.join("/"))
}

/// Canonicalize the file if it exists, otherwise canonicalize its parent
/// and re-attach the file name.
fn canonicalize_lenient(path: &Path) -> Result<PathBuf, OwnerError> {
    if let Ok(canonical) = path.canonicalize() {
        return Ok(canonical);
    }
    let not_found = || OwnerError::FileNotFound(path.to_path_buf());
    let file_name = path.file_name().ok_or_else(not_found)?;
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let parent = parent.canonicalize().map_err(|_| not_found())?;
    Ok(parent.join(file_name))
}

/// Author identity of a signature, falling back to `"unknown"` when the
/// requested field is missing or blank.
pub(crate) fn identity(signature: &Signature<'_>, mode: IdentityMode) -> String {
    let field = match mode {
        IdentityMode::Email => signature.email(),
        IdentityMode::Name => signature.name(),
    };
    match field.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => "unknown".to_string(),
    }
}
