//! Per-author aggregation of blame and commit records.
//!
//! Both signals reduce to the same shape: a raw count per author and a
//! normalized weight per author. Ordered maps keep every downstream step
//! independent of input order.

use std::collections::BTreeMap;

use git_owner_core::{BlameRecord, CommitRecord};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One author's slice of a signal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Share {
    /// Raw lines (blame) or commits (log).
    pub count: u64,
    /// Normalized weight in `[0, 1]`.
    pub weight: f64,
}

/// A normalized signal keyed by author identity.
#[derive(Debug, Clone, Default)]
pub(crate) struct Shares {
    /// Sum of raw counts across authors.
    pub total: u64,
    pub by_author: BTreeMap<String, Share>,
}

impl Shares {
    /// Whether the signal carries any usable weight.
    pub fn is_present(&self) -> bool {
        self.by_author.values().any(|s| s.weight > 0.0)
    }

    pub fn weight_of(&self, author: &str) -> f64 {
        self.by_author.get(author).map_or(0.0, |s| s.weight)
    }

    pub fn count_of(&self, author: &str) -> u64 {
        self.by_author.get(author).map_or(0, |s| s.count)
    }
}

/// Exponential age discount applied to commits.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Decay {
    /// Unix timestamp ages are measured from.
    pub reference_time: i64,
    pub half_life_days: f64,
    pub factor: f64,
}

impl Decay {
    /// Age in days at `timestamp`; commits newer than the reference time
    /// count as age zero.
    pub fn age_days(&self, timestamp: i64) -> f64 {
        let age_secs = self.reference_time.saturating_sub(timestamp).max(0);
        age_secs as f64 / SECONDS_PER_DAY
    }

    /// `factor ^ ((age_days - floor_days) / half_life_days)`.
    ///
    /// `floor_days` is the age of the newest commit under consideration, so
    /// that commit contributes exactly 1 and older ones cannot all underflow
    /// to zero. The shift cancels out once weights are normalized.
    pub fn contribution(&self, timestamp: i64, floor_days: f64) -> f64 {
        let excess = (self.age_days(timestamp) - floor_days).max(0.0);
        self.factor.powf(excess / self.half_life_days)
    }
}

/// Lines per author divided by total lines.
///
/// Records must already be validated (positive line counts).
pub(crate) fn blame_shares(records: &[BlameRecord]) -> Shares {
    // u128: any number of i64 line counts fits without overflow.
    let mut lines: BTreeMap<String, u128> = BTreeMap::new();
    for record in records {
        *lines.entry(record.author.clone()).or_default() += record.line_count.max(0) as u128;
    }

    let total: u128 = lines.values().sum();
    let by_author = lines
        .into_iter()
        .map(|(author, count)| {
            let weight = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            (
                author,
                Share {
                    count: saturate(count),
                    weight,
                },
            )
        })
        .collect();

    Shares {
        total: saturate(total),
        by_author,
    }
}

/// Commits per author divided by total commits, or the decayed equivalent.
pub(crate) fn commit_shares(records: &[CommitRecord], decay: Option<Decay>) -> Shares {
    // author -> (commit count, accumulated weight)
    let floor_days = decay.map(|d| {
        records
            .iter()
            .map(|r| d.age_days(r.timestamp))
            .fold(f64::INFINITY, f64::min)
    });

    let mut acc: BTreeMap<String, (u64, f64)> = BTreeMap::new();
    for record in records {
        let contribution = match (decay, floor_days) {
            (Some(d), Some(floor)) => d.contribution(record.timestamp, floor),
            _ => 1.0,
        };
        let entry = acc.entry(record.author.clone()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += contribution;
    }

    let total: u64 = acc.values().map(|(count, _)| count).sum();
    let weight_total: f64 = acc.values().map(|(_, w)| w).sum();

    let normalizable = weight_total > 0.0 && weight_total.is_finite();

    let by_author = acc
        .into_iter()
        .map(|(author, (count, raw))| {
            let weight = if normalizable { raw / weight_total } else { 0.0 };
            (author, Share { count, weight })
        })
        .collect();

    Shares { total, by_author }
}

fn saturate(n: u128) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Newest commit timestamp, used as the default decay reference.
pub(crate) fn newest_timestamp(records: &[CommitRecord]) -> Option<i64> {
    records.iter().map(|r| r.timestamp).max()
}
