//! Generated configuration file resource.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::fs::write_atomic;
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A text file whose full content is owned by bootstrap.
///
/// The file is rewritten in one step whenever its content differs from the
/// rendered text. When a backup path is set, the previous content is copied
/// there first; only one backup is ever kept.
#[derive(Debug, Clone)]
pub struct ConfigFileResource {
    /// Target path.
    pub path: PathBuf,
    /// Desired content.
    pub content: String,
    /// Where the previous version is preserved, if anywhere.
    pub backup: Option<PathBuf>,
}

impl ConfigFileResource {
    /// Create a resource without a backup copy.
    #[must_use]
    pub const fn new(path: PathBuf, content: String) -> Self {
        Self {
            path,
            content,
            backup: None,
        }
    }

    /// Keep the previous version at `backup` before overwriting.
    #[must_use]
    pub fn with_backup(mut self, backup: PathBuf) -> Self {
        self.backup = Some(backup);
        self
    }

    fn read_current(path: &Path) -> Result<Option<String>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}

impl Applicable for ConfigFileResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let current = Self::read_current(&self.path)?;
        if current.as_deref() == Some(self.content.as_str()) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        if let (Some(backup), Some(previous)) = (&self.backup, &current) {
            write_atomic(backup, previous)
                .with_context(|| format!("backing up {}", self.path.display()))?;
        }
        write_atomic(&self.path, &self.content)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ConfigFileResource {
    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: format!("{} is a directory", self.path.display()),
            });
        }
        match Self::read_current(&self.path)? {
            None => Ok(ResourceState::Missing),
            Some(current) if current == self.content => Ok(ResourceState::Correct),
            Some(current) => Ok(ResourceState::Incorrect {
                current: format!("{} bytes differ", current.len()),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_then_correct_after_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nvim").join("init.lua");
        let resource = ConfigFileResource::new(path.clone(), "x = 1\n".to_string());
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "x = 1\n");
    }

    #[test]
    fn incorrect_when_content_differs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kitty.conf");
        std::fs::write(&path, "old").unwrap();
        let resource = ConfigFileResource::new(path, "new".to_string());
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[test]
    fn directory_target_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let resource = ConfigFileResource::new(dir.path().to_path_buf(), String::new());
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
    }

    #[test]
    fn backup_keeps_only_previous_version() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".zshrc");
        let bak = dir.path().join(".zshrc.bak");
        std::fs::write(&rc, "v1").unwrap();

        ConfigFileResource::new(rc.clone(), "v2".to_string())
            .with_backup(bak.clone())
            .apply()
            .unwrap();
        assert_eq!(std::fs::read_to_string(&bak).unwrap(), "v1");

        ConfigFileResource::new(rc.clone(), "v3".to_string())
            .with_backup(bak.clone())
            .apply()
            .unwrap();
        assert_eq!(std::fs::read_to_string(&bak).unwrap(), "v2");
        assert_eq!(std::fs::read_to_string(&rc).unwrap(), "v3");

        let backups = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .contains(".bak")
            })
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn unchanged_content_is_not_rewritten_or_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".zshrc");
        let bak = dir.path().join(".zshrc.bak");
        std::fs::write(&rc, "same").unwrap();
        let change = ConfigFileResource::new(rc, "same".to_string())
            .with_backup(bak.clone())
            .apply()
            .unwrap();
        assert_eq!(change, ResourceChange::AlreadyCorrect);
        assert!(!bak.exists());
    }
}
