//! Shallow git checkout resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::fs::ensure_parent_dir;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// A repository cloned once into a fixed directory (e.g. the zinit plugin
/// manager). Existing checkouts are never updated.
#[derive(Debug)]
pub struct GitCheckoutResource<'a> {
    /// Clone URL.
    pub url: String,
    /// Destination working tree.
    pub dest: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> GitCheckoutResource<'a> {
    /// Create a new checkout resource.
    #[must_use]
    pub fn new(url: impl Into<String>, dest: PathBuf, executor: &'a dyn Executor) -> Self {
        Self {
            url: url.into(),
            dest,
            executor,
        }
    }
}

impl Applicable for GitCheckoutResource<'_> {
    fn description(&self) -> String {
        format!("{} → {}", self.url, self.dest.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.dest)?;
        let dest = self.dest.to_string_lossy();
        self.executor
            .run("git", &["clone", "--depth", "1", &self.url, &dest])
            .with_context(|| format!("cloning {}", self.url))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for GitCheckoutResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.dest.join(".git").exists() {
            return Ok(ResourceState::Correct);
        }
        if !self.dest.exists() {
            return Ok(ResourceState::Missing);
        }
        let empty = std::fs::read_dir(&self.dest)
            .with_context(|| format!("reading {}", self.dest.display()))?
            .next()
            .is_none();
        if empty {
            Ok(ResourceState::Missing)
        } else {
            Ok(ResourceState::Invalid {
                reason: format!("{} exists and is not a git checkout", self.dest.display()),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    const URL: &str = "https://github.com/zdharma-continuum/zinit.git";

    #[test]
    fn missing_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let executor = MockExecutor::fail();
        let resource = GitCheckoutResource::new(URL, dir.path().join("zinit.git"), &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn correct_when_git_dir_present() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("zinit.git");
        std::fs::create_dir_all(dest.join(".git")).unwrap();
        let executor = MockExecutor::fail();
        let resource = GitCheckoutResource::new(URL, dest, &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn invalid_when_occupied_by_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("zinit.git");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("stray"), "").unwrap();
        let executor = MockExecutor::fail();
        let resource = GitCheckoutResource::new(URL, dest, &executor);
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
    }

    #[test]
    fn apply_runs_shallow_clone() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("share").join("zinit").join("zinit.git");
        let executor = MockExecutor::ok("");
        let resource = GitCheckoutResource::new(URL, dest.clone(), &executor);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert!(dest.parent().unwrap().is_dir());
        assert_eq!(
            executor.calls(),
            vec![format!("git clone --depth 1 {URL} {}", dest.display())]
        );
    }
}
