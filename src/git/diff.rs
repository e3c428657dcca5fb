use crate::model::FileChangeCount;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;

const CONTEXT_RADIUS: usize = 3;
const BINARY_SNIFF_LEN: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Added,
    Removed,
    Context,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hunk {
    pub lines: Vec<LineOrigin>,
}

/// One file's side of a tree-to-tree diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub hunks: Vec<Hunk>,
}

impl FilePatch {
    /// Path the patch is accounted under: the new side, or the old side for deletions.
    pub fn identity(&self) -> Option<&str> {
        self.new_path.as_deref().or(self.old_path.as_deref())
    }

    pub fn added(&self) -> u64 {
        self.count(LineOrigin::Added)
    }

    pub fn removed(&self) -> u64 {
        self.count(LineOrigin::Removed)
    }

    pub fn changed_lines(&self) -> u64 {
        self.added() + self.removed()
    }

    fn count(&self, origin: LineOrigin) -> u64 {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter(|l| **l == origin)
            .count() as u64
    }
}

pub fn is_binary(data: &[u8]) -> bool {
    data.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

/// Unified-diff hunks between two blob bodies. Binary content produces none.
pub fn build_hunks(old: &[u8], new: &[u8]) -> Vec<Hunk> {
    if old == new || is_binary(old) || is_binary(new) {
        return Vec::new();
    }
    let diff = TextDiff::from_lines(old, new);

    let mut unified = diff.unified_diff();
    unified.context_radius(CONTEXT_RADIUS);
    unified
        .iter_hunks()
        .map(|hunk| Hunk {
            lines: hunk
                .iter_changes()
                .map(|change| match change.tag() {
                    ChangeTag::Insert => LineOrigin::Added,
                    ChangeTag::Delete => LineOrigin::Removed,
                    ChangeTag::Equal => LineOrigin::Context,
                })
                .collect(),
        })
        .collect()
}

/// Changed lines per file of interest. Patches outside `files` are ignored;
/// files of interest with no patch are simply absent.
pub fn tally(patches: &[FilePatch], files: &BTreeSet<String>) -> FileChangeCount {
    let mut counts = FileChangeCount::new();
    for patch in patches {
        let Some(path) = patch.identity() else { continue };
        if files.contains(path) {
            counts.add(path, patch.changed_lines());
        }
    }
    counts
}

/// Every old and new path named by `patches`.
pub fn touched_paths(patches: &[FilePatch]) -> BTreeSet<String> {
    patches
        .iter()
        .flat_map(|p| [p.old_path.as_ref(), p.new_path.as_ref()])
        .flatten()
        .cloned()
        .collect()
}
