use crate::error::{AlmanackError, Result};
use crate::git::GitRepo;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;
use tracing::{debug, info};

/// A remote repository cloned into a private temporary directory.
///
/// The directory is removed when this value is dropped.
pub struct ClonedRepo {
    repo: GitRepo,
    _workdir: TempDir,
}

impl ClonedRepo {
    /// Bare-clone `url`. Only history is fetched; no worktree is checked out.
    pub fn fetch(url: &str) -> Result<Self> {
        let workdir = tempfile::Builder::new().prefix("almanack-").tempdir()?;
        let target = workdir.path().join("repo");
        info!(%url, path = %target.display(), "cloning repository");

        let interrupt = AtomicBool::new(false);
        let mut prepare =
            gix::prepare_clone_bare(url, &target).map_err(|e| AlmanackError::Clone(e.to_string()))?;
        let (repo, _outcome) = prepare
            .fetch_only(gix::progress::Discard, &interrupt)
            .map_err(|e| AlmanackError::Clone(e.to_string()))?;
        debug!(%url, "clone finished");

        Ok(Self {
            repo: GitRepo::from_repository(repo),
            _workdir: workdir,
        })
    }

    pub fn repo(&self) -> &GitRepo {
        &self.repo
    }
}
