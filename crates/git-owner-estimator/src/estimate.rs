//! Blame/log merge and ranking.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use git_owner_core::{BlameRecord, CommitRecord, OwnerError, WeightConfig};
use tracing::debug;

use crate::report::{AuthorScore, OwnershipReport};
use crate::shares::{self, Decay, Shares};
use crate::validate::{validate_blame, validate_commits};

const SCORE_GRID: f64 = 1e12;

/// Estimate the owner of one file from its blame and commit records.
///
/// With recency decay enabled, commit ages are measured from the newest
/// commit in `commits`, which keeps the result a pure function of its
/// inputs. Use [`estimate_ownership_at`] to measure from another instant.
///
/// # Errors
///
/// - [`OwnerError::Config`] if `config` is out of range.
/// - [`OwnerError::InvalidRecord`] for an empty author, a line count below
///   one, or a negative line delta.
/// - [`OwnerError::NoHistory`] if neither signal carries any data.
///
/// # Examples
///
/// ```
/// use git_owner_core::{BlameRecord, CommitRecord, WeightConfig};
/// use git_owner_estimator::estimate_ownership;
///
/// let blame = vec![BlameRecord::new("alice", 80), BlameRecord::new("bob", 20)];
/// let commits: Vec<_> = (0..5)
///     .flat_map(|i| [CommitRecord::new("alice", i), CommitRecord::new("bob", i)])
///     .collect();
///
/// let report = estimate_ownership(&blame, &commits, &WeightConfig::default()).unwrap();
/// assert_eq!(report.estimated_owner, "alice");
/// assert!((report.authors[0].combined_score - 0.71).abs() < 1e-9);
/// ```
pub fn estimate_ownership(
    blame: &[BlameRecord],
    commits: &[CommitRecord],
    config: &WeightConfig,
) -> Result<OwnershipReport, OwnerError> {
    let reference_time = shares::newest_timestamp(commits).unwrap_or(0);
    estimate_ownership_at(blame, commits, config, reference_time)
}

/// Like [`estimate_ownership`], measuring commit ages from `reference_time`
/// (unix seconds). Commits newer than the reference count as age zero.
///
/// # Errors
///
/// Same as [`estimate_ownership`].
///
/// # Examples
///
/// ```
/// use git_owner_core::{CommitRecord, WeightConfig};
/// use git_owner_estimator::estimate_ownership_at;
///
/// const DAY: i64 = 86_400;
/// let config = WeightConfig {
///     recency_decay_enabled: true,
///     ..WeightConfig::default()
/// };
/// let commits = vec![
///     CommitRecord::new("old", 0),
///     CommitRecord::new("old", DAY),
///     CommitRecord::new("recent", 400 * DAY),
/// ];
///
/// let report = estimate_ownership_at(&[], &commits, &config, 400 * DAY).unwrap();
/// assert_eq!(report.estimated_owner, "recent");
/// ```
pub fn estimate_ownership_at(
    blame: &[BlameRecord],
    commits: &[CommitRecord],
    config: &WeightConfig,
    reference_time: i64,
) -> Result<OwnershipReport, OwnerError> {
    config.validate()?;
    validate_blame(blame)?;
    validate_commits(commits)?;

    let decay = config.recency_decay_enabled.then_some(Decay {
        reference_time,
        half_life_days: config.decay_half_life_days,
        factor: config.decay_factor,
    });

    let blame_shares = shares::blame_shares(blame);
    let commit_shares = shares::commit_shares(commits, decay);
    log_shares("blame", &blame_shares);
    log_shares("log", &commit_shares);

    let (blame_coefficient, commit_coefficient) =
        match (blame_shares.is_present(), commit_shares.is_present()) {
            (false, false) => return Err(OwnerError::NoHistory),
            (true, false) => (1.0, 0.0),
            (false, true) => (0.0, 1.0),
            (true, true) => (
                config.blame_weight_coefficient,
                1.0 - config.blame_weight_coefficient,
            ),
        };

    let authors: BTreeSet<&str> = blame_shares
        .by_author
        .keys()
        .chain(commit_shares.by_author.keys())
        .map(String::as_str)
        .collect();

    let mut scores: Vec<AuthorScore> = authors
        .into_iter()
        .map(|author| {
            let blame_weight = blame_shares.weight_of(author);
            let commit_weight = commit_shares.weight_of(author);
            let combined_score =
                snap(blame_coefficient * blame_weight + commit_coefficient * commit_weight);
            AuthorScore {
                author: author.to_string(),
                blame_weight,
                commit_weight,
                combined_score,
                blame_lines: blame_shares.count_of(author),
                commit_count: commit_shares.count_of(author),
            }
        })
        .collect();

    scores.sort_by(rank_order);

    let estimated_owner = scores
        .first()
        .map(|s| s.author.clone())
        .ok_or(OwnerError::NoHistory)?;

    if let Some(n) = config.top_n {
        scores.truncate(n);
    }

    debug!(
        owner = %estimated_owner,
        authors = scores.len(),
        "ownership estimated"
    );

    Ok(OwnershipReport {
        estimated_owner,
        authors: scores,
        total_lines: blame_shares.total,
        total_commits: commit_shares.total,
    })
}

/// Rounds a score onto a fixed grid and clamps it to `[0, 1]`, so sums that
/// are equal on paper compare equal and fall through to the tie-breaks.
fn snap(score: f64) -> f64 {
    ((score * SCORE_GRID).round() / SCORE_GRID).clamp(0.0, 1.0)
}

/// Total order: score, then blame share, then commit count (all
/// descending), then author identity ascending.
fn rank_order(a: &AuthorScore, b: &AuthorScore) -> Ordering {
    b.combined_score
        .total_cmp(&a.combined_score)
        .then_with(|| b.blame_weight.total_cmp(&a.blame_weight))
        .then_with(|| b.commit_count.cmp(&a.commit_count))
        .then_with(|| a.author.cmp(&b.author))
}

fn log_shares(signal: &str, shares: &Shares) {
    for (author, share) in &shares.by_author {
        debug!(
            signal,
            author = %author,
            count = share.count,
            weight = share.weight,
            "contributor share"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn blame(entries: &[(&str, i64)]) -> Vec<BlameRecord> {
        entries
            .iter()
            .map(|(author, lines)| BlameRecord::new(*author, *lines))
            .collect()
    }

    fn commits(entries: &[(&str, usize)]) -> Vec<CommitRecord> {
        let mut out = Vec::new();
        let mut ts = 1_700_000_000;
        for (author, count) in entries {
            for _ in 0..*count {
                out.push(CommitRecord::new(*author, ts));
                ts += 60;
            }
        }
        out
    }

    fn score<'a>(report: &'a OwnershipReport, author: &str) -> &'a AuthorScore {
        report
            .authors
            .iter()
            .find(|s| s.author == author)
            .unwrap_or_else(|| panic!("{author} missing from report"))
    }

    #[test]
    fn blame_and_log_merge_with_default_coefficient() {
        let report = estimate_ownership(
            &blame(&[("alice", 80), ("bob", 20)]),
            &commits(&[("alice", 5), ("bob", 5)]),
            &WeightConfig::default(),
        )
        .unwrap();

        let alice = score(&report, "alice");
        let bob = score(&report, "bob");
        assert!((alice.blame_weight - 0.8).abs() < TOLERANCE);
        assert!((bob.blame_weight - 0.2).abs() < TOLERANCE);
        assert!((alice.commit_weight - 0.5).abs() < TOLERANCE);
        assert!((bob.commit_weight - 0.5).abs() < TOLERANCE);
        assert!((alice.combined_score - 0.71).abs() < TOLERANCE);
        assert!((bob.combined_score - 0.29).abs() < TOLERANCE);
        assert_eq!(report.estimated_owner, "alice");
        assert_eq!(report.authors[0].author, "alice");
        assert_eq!(report.total_lines, 100);
        assert_eq!(report.total_commits, 10);
    }

    #[test]
    fn no_records_at_all_is_no_history() {
        let err = estimate_ownership(&[], &[], &WeightConfig::default()).unwrap_err();
        assert!(err.is_no_history());
    }

    #[test]
    fn empty_author_is_invalid_record() {
        let err = estimate_ownership(
            &blame(&[("", 10)]),
            &commits(&[("alice", 1)]),
            &WeightConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_invalid_record());
    }

    #[test]
    fn negative_line_count_is_invalid_not_clamped() {
        let err = estimate_ownership(
            &blame(&[("alice", 10), ("bob", -2)]),
            &[],
            &WeightConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_invalid_record());
    }

    #[test]
    fn sole_author_scores_one() {
        let report = estimate_ownership(
            &blame(&[("alice", 7), ("alice", 3)]),
            &commits(&[("alice", 4)]),
            &WeightConfig::default(),
        )
        .unwrap();

        assert_eq!(report.authors.len(), 1);
        assert_eq!(report.estimated_owner, "alice");
        assert!((report.authors[0].combined_score - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn equal_scores_break_on_blame_weight() {
        // alice: 0.5 * 0.75 + 0.5 * 0.25 = 0.5
        // bob:   0.5 * 0.25 + 0.5 * 0.75 = 0.5
        let config = WeightConfig {
            blame_weight_coefficient: 0.5,
            ..WeightConfig::default()
        };
        for _ in 0..3 {
            let report = estimate_ownership(
                &blame(&[("bob", 1), ("alice", 3)]),
                &commits(&[("bob", 3), ("alice", 1)]),
                &config,
            )
            .unwrap();
            assert_eq!(
                report.authors[0].combined_score,
                report.authors[1].combined_score
            );
            assert_eq!(report.estimated_owner, "alice");
        }
    }

    #[test]
    fn rounding_noise_does_not_decide_a_tie() {
        // alice: 0.7 * 0.6 + 0.3 * 0.1 = 0.45
        // bob:   0.7 * 0.3 + 0.3 * 0.8 = 0.45
        let report = estimate_ownership(
            &blame(&[("alice", 6), ("bob", 3), ("carol", 1)]),
            &commits(&[("alice", 1), ("bob", 8), ("carol", 1)]),
            &WeightConfig::default(),
        )
        .unwrap();

        assert_eq!(
            score(&report, "alice").combined_score,
            score(&report, "bob").combined_score
        );
        assert_eq!(report.estimated_owner, "alice");
        assert_eq!(report.authors[1].author, "bob");
    }

    #[test]
    fn full_tie_breaks_on_author_identity() {
        let report = estimate_ownership(
            &blame(&[("zoe", 5), ("adam", 5)]),
            &commits(&[("zoe", 2), ("adam", 2)]),
            &WeightConfig::default(),
        )
        .unwrap();
        assert_eq!(report.estimated_owner, "adam");
        assert_eq!(report.authors[1].author, "zoe");
    }

    #[test]
    fn equal_score_and_blame_breaks_on_commit_count() {
        // Blame-only weighting: log shares do not move the score, but the raw
        // commit count still orders the tie.
        let config = WeightConfig {
            blame_weight_coefficient: 1.0,
            ..WeightConfig::default()
        };
        let report = estimate_ownership(
            &blame(&[("adam", 5), ("zoe", 5)]),
            &commits(&[("adam", 1), ("zoe", 4)]),
            &config,
        )
        .unwrap();
        assert_eq!(report.estimated_owner, "zoe");
    }

    #[test]
    fn author_missing_from_one_signal_gets_zero_term() {
        let report = estimate_ownership(
            &blame(&[("alice", 10)]),
            &commits(&[("alice", 1), ("bob", 1)]),
            &WeightConfig::default(),
        )
        .unwrap();

        let bob = score(&report, "bob");
        assert_eq!(bob.blame_weight, 0.0);
        assert_eq!(bob.blame_lines, 0);
        assert!((bob.combined_score - 0.15).abs() < TOLERANCE);
    }

    #[test]
    fn missing_blame_falls_back_to_log() {
        let report = estimate_ownership(
            &[],
            &commits(&[("alice", 1), ("bob", 3)]),
            &WeightConfig::default(),
        )
        .unwrap();

        assert_eq!(report.estimated_owner, "bob");
        for s in &report.authors {
            assert!((s.combined_score - s.commit_weight).abs() < TOLERANCE);
        }
        assert_eq!(report.total_lines, 0);
    }

    #[test]
    fn missing_log_falls_back_to_blame() {
        let report = estimate_ownership(
            &blame(&[("alice", 1), ("bob", 3)]),
            &[],
            &WeightConfig::default(),
        )
        .unwrap();

        assert_eq!(report.estimated_owner, "bob");
        for s in &report.authors {
            assert!((s.combined_score - s.blame_weight).abs() < TOLERANCE);
        }
    }

    #[test]
    fn recency_lets_recent_contributor_overtake() {
        const DAY: i64 = 86_400;
        let now = 2_000 * DAY;
        let mut log = Vec::new();
        for i in 0..4 {
            log.push(CommitRecord::new("veteran", now - (700 + i) * DAY));
        }
        log.push(CommitRecord::new("newcomer", now - DAY));
        log.push(CommitRecord::new("newcomer", now));

        let plain = estimate_ownership(&[], &log, &WeightConfig::default()).unwrap();
        assert_eq!(plain.estimated_owner, "veteran");

        let decayed = WeightConfig {
            recency_decay_enabled: true,
            ..WeightConfig::default()
        };
        let report = estimate_ownership(&[], &log, &decayed).unwrap();
        assert_eq!(report.estimated_owner, "newcomer");
        let sum: f64 = report.authors.iter().map(|s| s.commit_weight).sum();
        assert!((sum - 1.0).abs() < TOLERANCE);
        // Raw counts stay undecayed.
        assert_eq!(score(&report, "veteran").commit_count, 4);
    }

    #[test]
    fn explicit_reference_time_shifts_ages() {
        const DAY: i64 = 86_400;
        let log = vec![CommitRecord::new("a", 0), CommitRecord::new("b", 90 * DAY)];
        let config = WeightConfig {
            recency_decay_enabled: true,
            ..WeightConfig::default()
        };

        // Measured from b's commit: a is one half-life old.
        let report = estimate_ownership_at(&[], &log, &config, 90 * DAY).unwrap();
        let a = score(&report, "a").commit_weight;
        let b = score(&report, "b").commit_weight;
        assert!((b / a - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn steep_decay_on_old_history_still_has_history() {
        const DAY: i64 = 86_400;
        let log = vec![CommitRecord::new("first", 0), CommitRecord::new("second", DAY)];
        let config = WeightConfig {
            recency_decay_enabled: true,
            decay_factor: 1e-300,
            ..WeightConfig::default()
        };

        let report = estimate_ownership_at(&[], &log, &config, 400 * DAY).unwrap();
        assert_eq!(report.estimated_owner, "second");
        let sum: f64 = report.authors.iter().map(|s| s.commit_weight).sum();
        assert!((sum - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn huge_line_counts_are_scored_without_panicking() {
        let report = estimate_ownership(
            &blame(&[("alice", i64::MAX), ("alice", i64::MAX), ("bob", i64::MAX)]),
            &[],
            &WeightConfig::default(),
        )
        .unwrap();
        assert_eq!(report.estimated_owner, "alice");
        assert!((score(&report, "alice").blame_weight - 2.0 / 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn top_n_truncates_but_keeps_owner() {
        let config = WeightConfig {
            top_n: Some(2),
            ..WeightConfig::default()
        };
        let report = estimate_ownership(
            &blame(&[("a", 5), ("b", 3), ("c", 2)]),
            &commits(&[("a", 1), ("b", 1), ("c", 1)]),
            &config,
        )
        .unwrap();

        assert_eq!(report.authors.len(), 2);
        assert_eq!(report.estimated_owner, "a");
        assert_eq!(report.total_lines, 10);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = WeightConfig {
            blame_weight_coefficient: 2.0,
            ..WeightConfig::default()
        };
        let err = estimate_ownership(&blame(&[("a", 1)]), &[], &config).unwrap_err();
        assert!(matches!(err, OwnerError::Config(_)));
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let b = blame(&[("carol", 3), ("alice", 3), ("bob", 3), ("alice", 1)]);
        let c = commits(&[("bob", 2), ("carol", 2), ("alice", 1), ("dave", 1)]);
        let config = WeightConfig {
            recency_decay_enabled: true,
            ..WeightConfig::default()
        };

        let first = serde_json::to_string(&estimate_ownership(&b, &c, &config).unwrap()).unwrap();
        for _ in 0..5 {
            let again =
                serde_json::to_string(&estimate_ownership(&b, &c, &config).unwrap()).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn input_order_does_not_change_ranking() {
        let b = blame(&[("alice", 4), ("bob", 4), ("carol", 2)]);
        let c = commits(&[("alice", 2), ("bob", 2), ("carol", 1)]);
        let mut b_rev = b.clone();
        b_rev.reverse();
        let mut c_rev = c.clone();
        c_rev.reverse();

        let forward = estimate_ownership(&b, &c, &WeightConfig::default()).unwrap();
        let backward = estimate_ownership(&b_rev, &c_rev, &WeightConfig::default()).unwrap();
        let order = |r: &OwnershipReport| {
            r.authors
                .iter()
                .map(|s| s.author.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(order(&forward), order(&backward));
        assert_eq!(order(&forward), vec!["alice", "bob", "carol"]);
    }
}
