use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub parent_ids: Vec<String>,
}

/// Changed-line counts (additions + deletions) per repository-relative path.
///
/// Built once per computation and treated as a snapshot afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileChangeCount(BTreeMap<String, u64>);

impl FileChangeCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str, lines: u64) {
        *self.0.entry(path.to_string()).or_insert(0) += lines;
    }

    /// Count for `path`, treating files that never appeared in the diff as unchanged.
    pub fn get(&self, path: &str) -> u64 {
        self.0.get(path).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(path, count)| (path.as_str(), *count))
    }

    /// Snapshot keyed by exactly `files`, absent paths defaulting to 0.
    pub fn covering(&self, files: &BTreeSet<String>) -> Self {
        Self(files.iter().map(|f| (f.clone(), self.get(f))).collect())
    }
}

impl FromIterator<(String, u64)> for FileChangeCount {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (path, lines) in iter {
            counts.add(&path, lines);
        }
        counts
    }
}

/// Per-file entropy contribution, same key set as the [`FileChangeCount`] it came from.
pub type FileEntropy = BTreeMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntropyEntry {
    pub path: String,
    pub changed_lines: u64,
    pub entropy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntropyReport {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repo_path: String,
    pub source_commit: String,
    pub target_commit: String,
    pub file_count: usize,
    pub total_normalized_entropy: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileEntropyEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoAnalysis {
    pub version: u32,
    pub repository_url: String,
    pub total_normalized_entropy: f64,
    pub first_commit_date: String,
    pub most_recent_commit_date: String,
    pub time_of_existence_days: i64,
}
