use crate::error::{AlmanackError, Result};
use crate::git::diff::{build_hunks, tally, touched_paths, FilePatch};
use crate::model::{CommitInfo, FileChangeCount};
use chrono::DateTime;
use gix::bstr::BString;
use gix::object::tree::diff::ChangeDetached;
use gix::objs::tree::EntryMode;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        Ok(Self::from_repository(repo))
    }

    pub(crate) fn from_repository(repo: Repository) -> Self {
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        Self { repo, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a hash or any rev-spec to the commit it names.
    pub fn resolve_commit(&self, rev: &str) -> Result<CommitInfo> {
        let id = self.resolve_id(rev)?;
        self.commit_info(id)
    }

    fn resolve_id(&self, rev: &str) -> Result<ObjectId> {
        let id = self
            .repo
            .rev_parse_single(rev)
            .map_err(|e| AlmanackError::unresolvable(rev, e))?;
        let commit = id
            .object()
            .map_err(|e| AlmanackError::unresolvable(rev, e))?
            .try_into_commit()
            .map_err(|_| AlmanackError::unresolvable(rev, "not a commit"))?;
        Ok(commit.id)
    }

    fn commit_info(&self, id: ObjectId) -> Result<CommitInfo> {
        let commit = self
            .repo
            .find_commit(id)
            .map_err(|e| AlmanackError::RepositoryAccess(e.to_string()))?;
        let secs = commit.time()?.seconds;
        let timestamp = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| AlmanackError::RepositoryAccess(format!("Invalid timestamp: {secs}")))?;

        Ok(CommitInfo {
            id: id.to_string(),
            timestamp,
            parent_ids: commit.parent_ids().map(|p| p.to_string()).collect(),
        })
    }

    pub fn head(&self) -> Result<CommitInfo> {
        let head = self.repo.head_commit().map_err(|_| AlmanackError::EmptyHistory)?;
        self.commit_info(head.id)
    }

    /// Every commit reachable from HEAD, most recent first.
    pub fn list_commits(&self) -> Result<Vec<CommitInfo>> {
        let head = self.repo.head_commit().map_err(|_| AlmanackError::EmptyHistory)?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head.id]);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} ({pos})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Walking history...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }
            let commit = self
                .repo
                .find_commit(commit_id)
                .map_err(|e| AlmanackError::RepositoryAccess(e.to_string()))?;
            stack.extend(commit.parent_ids().map(|id| id.detach()));
            commits.push(self.commit_info(commit_id)?);
            pb.inc(1);
        }
        pb.finish_and_clear();

        // Stable: commits sharing a timestamp keep walk order, children before parents.
        commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        debug!(count = commits.len(), "walked history");
        Ok(commits)
    }

    /// The oldest root commit reachable from HEAD, and HEAD itself.
    pub fn history_bounds(&self) -> Result<(CommitInfo, CommitInfo)> {
        let head = self.head()?;
        let first = self
            .list_commits()?
            .into_iter()
            .filter(|c| c.parent_ids.is_empty())
            .min_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)))
            .unwrap_or_else(|| head.clone());
        Ok((first, head))
    }

    /// Per-file patches of the single tree-to-tree diff `source..target`.
    pub fn diff_patches(&self, source: &str, target: &str) -> Result<Vec<FilePatch>> {
        let source_id = self.resolve_id(source)?;
        let target_id = self.resolve_id(target)?;
        self.diff_ids(source_id, target_id)
    }

    fn diff_ids(&self, source_id: ObjectId, target_id: ObjectId) -> Result<Vec<FilePatch>> {
        let source_tree = self.repo.find_commit(source_id)
            .map_err(|e| AlmanackError::RepositoryAccess(e.to_string()))?
            .tree()?;
        let target_tree = self.repo.find_commit(target_id)
            .map_err(|e| AlmanackError::RepositoryAccess(e.to_string()))?
            .tree()?;

        let changes: Vec<ChangeDetached> =
            self.repo.diff_tree_to_tree(Some(&source_tree), Some(&target_tree), None)?;

        let mut patches = Vec::new();
        for change in changes {
            self.push_patches(change, &mut patches)?;
        }
        Ok(patches)
    }

    fn push_patches(&self, change: ChangeDetached, patches: &mut Vec<FilePatch>) -> Result<()> {
        match change {
            ChangeDetached::Addition { id, location, entry_mode, .. } => {
                if is_file(entry_mode) {
                    patches.push(self.added_patch(&location, id)?);
                }
            }
            ChangeDetached::Deletion { id, location, entry_mode, .. } => {
                if is_file(entry_mode) {
                    patches.push(self.deleted_patch(&location, id)?);
                }
            }
            ChangeDetached::Modification {
                previous_id,
                previous_entry_mode,
                id,
                entry_mode,
                location,
                ..
            } => {
                if !is_file(entry_mode) || !is_file(previous_entry_mode) {
                    return Ok(());
                }
                let path = path_string(&location);
                // Mode-only changes keep the same blob and yield no hunks.
                let hunks = if previous_id == id {
                    Vec::new()
                } else {
                    build_hunks(&self.blob(previous_id)?, &self.blob(id)?)
                };
                patches.push(FilePatch {
                    old_path: Some(path.clone()),
                    new_path: Some(path),
                    hunks,
                });
            }
            // Rename and copy detection follows repository config, so rewrites are
            // split back into plain deletions and additions to keep counts stable.
            ChangeDetached::Rewrite {
                source_id,
                source_location,
                source_entry_mode,
                id,
                location,
                entry_mode,
                copy,
                ..
            } => {
                if !copy && is_file(source_entry_mode) {
                    patches.push(self.deleted_patch(&source_location, source_id)?);
                }
                if is_file(entry_mode) {
                    patches.push(self.added_patch(&location, id)?);
                }
            }
        }
        Ok(())
    }

    fn added_patch(&self, location: &BString, id: ObjectId) -> Result<FilePatch> {
        Ok(FilePatch {
            old_path: None,
            new_path: Some(path_string(location)),
            hunks: build_hunks(&[], &self.blob(id)?),
        })
    }

    fn deleted_patch(&self, location: &BString, id: ObjectId) -> Result<FilePatch> {
        Ok(FilePatch {
            old_path: Some(path_string(location)),
            new_path: None,
            hunks: build_hunks(&self.blob(id)?, &[]),
        })
    }

    fn blob(&self, id: ObjectId) -> Result<Vec<u8>> {
        let object = self.repo.find_object(id)?;
        Ok(object.detach().data)
    }

    /// Every old and new path appearing in the diff `source..target`.
    pub fn edited_files(&self, source: &str, target: &str) -> Result<BTreeSet<String>> {
        Ok(touched_paths(&self.diff_patches(source, target)?))
    }

    /// Edited files of `source..target` and their changed-line counts, from one diff.
    pub fn range_changes(&self, source: &str, target: &str) -> Result<(BTreeSet<String>, FileChangeCount)> {
        let patches = self.diff_patches(source, target)?;
        let files = touched_paths(&patches);
        let counts = tally(&patches, &files);
        Ok((files, counts))
    }

    /// Changed lines (additions + deletions) per file of interest between two commits.
    pub fn count_changed_lines(
        &self,
        source: &str,
        target: &str,
        files: &BTreeSet<String>,
    ) -> Result<FileChangeCount> {
        let source_id = self.resolve_id(source)?;
        let target_id = self.resolve_id(target)?;
        if files.is_empty() {
            return Ok(FileChangeCount::new());
        }
        let patches = self.diff_ids(source_id, target_id)?;
        Ok(tally(&patches, files))
    }
}

fn is_file(mode: EntryMode) -> bool {
    !mode.is_tree() && !mode.is_commit()
}

fn path_string(location: &BString) -> String {
    location.to_string()
}
