//! Ranked ownership output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One author's weights for a file.
///
/// # Examples
///
/// ```
/// use git_owner_estimator::report::AuthorScore;
///
/// let score = AuthorScore {
///     author: "alice@example.com".into(),
///     blame_weight: 0.8,
///     commit_weight: 0.5,
///     combined_score: 0.71,
///     blame_lines: 80,
///     commit_count: 5,
/// };
/// assert!(score.combined_score > 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorScore {
    /// Author identity.
    pub author: String,
    /// Share of the file's current lines.
    pub blame_weight: f64,
    /// Share of (optionally decayed) commit activity.
    pub commit_weight: f64,
    /// Weighted merge of both shares, in `[0, 1]`.
    pub combined_score: f64,
    /// Lines currently attributed to the author.
    pub blame_lines: u64,
    /// Commits by the author that touched the file.
    pub commit_count: u64,
}

/// Authors ranked by `combined_score`, best first.
///
/// # Examples
///
/// ```
/// use git_owner_core::{BlameRecord, CommitRecord, WeightConfig};
/// use git_owner_estimator::estimate_ownership;
///
/// let report = estimate_ownership(
///     &[BlameRecord::new("alice", 10)],
///     &[CommitRecord::new("alice", 0)],
///     &WeightConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(report.estimated_owner, "alice");
/// assert!(report.runner_up_margin().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipReport {
    /// Author of the top-ranked entry.
    pub estimated_owner: String,
    /// Ranked entries, possibly truncated to `top_n`.
    pub authors: Vec<AuthorScore>,
    /// Lines covered by blame records.
    pub total_lines: u64,
    /// Number of commit records.
    pub total_commits: u64,
}

impl OwnershipReport {
    /// Score gap between the first and second retained entries.
    ///
    /// A small margin means ownership is shared or ambiguous. `None` when
    /// fewer than two entries are retained.
    pub fn runner_up_margin(&self) -> Option<f64> {
        match self.authors.as_slice() {
            [first, second, ..] => Some(first.combined_score - second.combined_score),
            _ => None,
        }
    }

    /// Render the report as a markdown string.
    ///
    /// # Examples
    ///
    /// ```
    /// use git_owner_core::{BlameRecord, WeightConfig};
    /// use git_owner_estimator::estimate_ownership;
    ///
    /// let report =
    ///     estimate_ownership(&[BlameRecord::new("alice", 4)], &[], &WeightConfig::default())
    ///         .unwrap();
    /// let md = report.to_markdown();
    /// assert!(md.contains("**Estimated owner:** alice"));
    /// assert!(md.contains("| 1 | alice |"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("**Estimated owner:** {}\n\n", self.estimated_owner));
        out.push_str("| Rank | Author | Score | Blame | Log | Lines | Commits |\n");
        out.push_str("|------|--------|-------|-------|-----|-------|---------|\n");
        for (i, a) in self.authors.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {:.1}% | {:.1}% | {:.1}% | {} | {} |\n",
                i + 1,
                a.author,
                a.combined_score * 100.0,
                a.blame_weight * 100.0,
                a.commit_weight * 100.0,
                a.blame_lines,
                a.commit_count,
            ));
        }
        out.push_str(&format!(
            "\n{} lines, {} commits\n",
            self.total_lines, self.total_commits
        ));
        out
    }
}

impl fmt::Display for OwnershipReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, a) in self.authors.iter().enumerate() {
            writeln!(
                f,
                "#{:>2}  {}  ({:.1}%)",
                i + 1,
                a.author,
                a.combined_score * 100.0
            )?;
        }
        Ok(())
    }
}
