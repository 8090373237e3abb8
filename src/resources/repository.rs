//! Backup staging repository: a local git working tree mirrored to a remote.
use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Repository, Signature};

use crate::error::PublishError;
use crate::exec::Executor;

/// Name of the remote the staging repository pushes to.
pub const REMOTE_NAME: &str = "origin";

/// Identity used when no git identity is configured.
const FALLBACK_NAME: &str = "bootstrap";
const FALLBACK_EMAIL: &str = "bootstrap@localhost";

/// Result of staging and committing the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit was created.
    Committed {
        /// Abbreviated commit id.
        id: String,
    },
    /// The tree matches `HEAD`; nothing was written.
    NothingToCommit,
}

/// Local staging repository for dotfile backups.
pub struct StagingRepository {
    dir: PathBuf,
    repo: Repository,
}

impl std::fmt::Debug for StagingRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingRepository")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl StagingRepository {
    /// Open the repository at `dir`, creating the directory and initialising
    /// a repository when needed. When `remote` is set it is registered (or
    /// re-pointed) as [`REMOTE_NAME`].
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::StagingDirectory`] if the directory cannot be
    /// created, or [`PublishError::Repository`] if git operations fail.
    pub fn open_or_init(dir: &Path, remote: Option<&str>) -> Result<Self, PublishError> {
        std::fs::create_dir_all(dir).map_err(|source| PublishError::StagingDirectory {
            path: dir.display().to_string(),
            source,
        })?;
        let repo = match Repository::open(dir) {
            Ok(repo) => repo,
            Err(e) if e.code() == git2::ErrorCode::NotFound => Repository::init(dir)?,
            Err(e) => return Err(e.into()),
        };
        if let Some(url) = remote {
            match repo.find_remote(REMOTE_NAME) {
                Ok(existing) if existing.url() == Some(url) => {}
                Ok(_) => repo.remote_set_url(REMOTE_NAME, url)?,
                Err(_) => {
                    repo.remote(REMOTE_NAME, url)?;
                }
            }
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            repo,
        })
    }

    /// Working tree path.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// URL of [`REMOTE_NAME`], if registered.
    #[must_use]
    pub fn remote_url(&self) -> Option<String> {
        self.repo
            .find_remote(REMOTE_NAME)
            .ok()
            .and_then(|r| r.url().map(String::from))
    }

    /// Stage every file in the working tree and commit it.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Repository`] if staging or committing fails.
    pub fn commit_all(&self, message: &str) -> Result<CommitOutcome, PublishError> {
        let mut index = self.repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree_oid = index.write_tree()?;

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let unchanged = match &parent {
            Some(commit) => commit.tree_id() == tree_oid,
            None => index.is_empty(),
        };
        if unchanged {
            return Ok(CommitOutcome::NothingToCommit);
        }

        let tree = self.repo.find_tree(tree_oid)?;
        let signature = self.signature()?;
        let parents: Vec<_> = parent.iter().collect();
        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        let id = oid.to_string().chars().take(7).collect();
        Ok(CommitOutcome::Committed { id })
    }

    fn signature(&self) -> Result<Signature<'static>, PublishError> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(_) => Ok(Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?),
        }
    }

    /// Push the current branch to [`REMOTE_NAME`] with the `git` binary, so
    /// the operator's SSH agent and credential helpers apply.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::PushFailed`] if the push command fails.
    pub fn push(&self, executor: &dyn Executor) -> Result<(), PublishError> {
        executor
            .run_in(&self.dir, "git", &["push", "-u", REMOTE_NAME, "HEAD"])
            .map(|_| ())
            .map_err(|e| PublishError::PushFailed {
                remote: REMOTE_NAME.to_string(),
                reason: format!("{e:#}"),
            })
    }
}
