//! Shannon entropy of how changed lines spread across files.
//!
//! Each file's share of all changed lines is treated as a probability `p`,
//! and contributes `-p * log2(p)`. Summing the contributions gives the
//! entropy of the whole change distribution; dividing by the number of
//! requested files gives the normalized score.

use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{FileChangeCount, FileEntropy};
use std::collections::BTreeSet;

/// Entropy contribution of every file in `change_counts`.
///
/// Files with no changed lines, or a snapshot with no changes at all,
/// contribute `0.0`.
pub fn per_file_entropy(change_counts: &FileChangeCount) -> FileEntropy {
    let total = change_counts.total();

    change_counts
        .iter()
        .map(|(path, count)| (path.to_string(), contribution(count, total)))
        .collect()
}

/// Total entropy of `change_counts` divided by the number of requested files.
///
/// The denominator is the size of `files_of_interest`, not the number of
/// files that actually changed. An empty request scores `0.0`.
pub fn aggregate_entropy(change_counts: &FileChangeCount, files_of_interest: &BTreeSet<String>) -> f64 {
    if files_of_interest.is_empty() {
        return 0.0;
    }
    let total_entropy: f64 = per_file_entropy(&change_counts.covering(files_of_interest))
        .values()
        .sum();
    total_entropy / files_of_interest.len() as f64
}

fn contribution(count: u64, total: u64) -> f64 {
    if count == 0 || total == 0 {
        return 0.0;
    }
    debug_assert!(count <= total, "file count {count} exceeds total {total}");
    let p = count as f64 / total as f64;
    -p * p.log2()
}

/// Per-file entropy for `files` over the commit range `source..target`.
///
/// The result is keyed by exactly `files`; paths the diff never touched are 0.
pub fn normalized_entropy(
    repo: &GitRepo,
    source: &str,
    target: &str,
    files: &BTreeSet<String>,
) -> Result<FileEntropy> {
    let counts = repo.count_changed_lines(source, target, files)?;
    Ok(per_file_entropy(&counts.covering(files)))
}

/// Normalized aggregate entropy for `files` over the commit range `source..target`.
pub fn aggregate_entropy_for_range(
    repo: &GitRepo,
    source: &str,
    target: &str,
    files: &BTreeSet<String>,
) -> Result<f64> {
    let counts = repo.count_changed_lines(source, target, files)?;
    Ok(aggregate_entropy(&counts, files))
}
