//! SSH key pair resource.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Key algorithm passed to `ssh-keygen`.
pub const KEY_TYPE: &str = "ed25519";

/// An SSH key pair at a fixed path, generated with an empty passphrase.
///
/// An existing private key is never touched.
#[derive(Debug)]
pub struct SshKeyResource<'a> {
    /// Private key path; the public key is the same path with `.pub`.
    pub path: PathBuf,
    /// Key comment, usually the operator's email.
    pub comment: String,
    executor: &'a dyn Executor,
}

impl<'a> SshKeyResource<'a> {
    /// Create a new SSH key resource.
    #[must_use]
    pub fn new(path: PathBuf, comment: impl Into<String>, executor: &'a dyn Executor) -> Self {
        Self {
            path,
            comment: comment.into(),
            executor,
        }
    }

    /// Path of the public half.
    #[must_use]
    pub fn public_key_path(&self) -> PathBuf {
        public_key_path(&self.path)
    }

    /// Contents of the public key, trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the public key cannot be read.
    pub fn public_key(&self) -> Result<String> {
        let path = self.public_key_path();
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(text.trim().to_string())
    }
}

fn public_key_path(private: &Path) -> PathBuf {
    let mut name = private.as_os_str().to_os_string();
    name.push(".pub");
    PathBuf::from(name)
}

/// Create `dir` if needed and restrict it to the owner.
fn ensure_ssh_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))
            .with_context(|| format!("chmod 700 {}", dir.display()))?;
    }
    Ok(())
}

impl Applicable for SshKeyResource<'_> {
    fn description(&self) -> String {
        format!("{KEY_TYPE} key {}", self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.path.exists() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        if let Some(dir) = self.path.parent() {
            ensure_ssh_dir(dir)?;
        }
        let path = self.path.to_string_lossy();
        self.executor
            .run(
                "ssh-keygen",
                &["-t", KEY_TYPE, "-C", &self.comment, "-f", &path, "-N", ""],
            )
            .context("generating SSH key")?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SshKeyResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: format!("{} is a directory", self.path.display()),
            });
        }
        if self.path.exists() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn public_key_path_appends_suffix() {
        assert_eq!(
            public_key_path(Path::new("/home/a/.ssh/id_ed25519")),
            PathBuf::from("/home/a/.ssh/id_ed25519.pub")
        );
    }

    #[test]
    fn existing_key_is_correct_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("id_ed25519");
        std::fs::write(&key, "PRIVATE").unwrap();
        let executor = MockExecutor::fail();
        let resource = SshKeyResource::new(key.clone(), "a@b", &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(resource.apply().unwrap(), ResourceChange::AlreadyCorrect);
        assert_eq!(executor.call_count(), 0);
        assert_eq!(std::fs::read_to_string(key).unwrap(), "PRIVATE");
    }

    #[test]
    fn apply_runs_ssh_keygen_with_empty_passphrase() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join(".ssh").join("id_ed25519");
        let executor = MockExecutor::ok("");
        let resource = SshKeyResource::new(key.clone(), "ada@example.com", &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert!(dir.path().join(".ssh").is_dir());
        assert_eq!(
            executor.calls(),
            vec![format!(
                "ssh-keygen -t ed25519 -C ada@example.com -f {} -N ",
                key.display()
            )]
        );
    }

    #[cfg(unix)]
    #[test]
    fn new_ssh_dir_is_private() {
        use std::os::unix::fs::PermissionsExt as _;
        let dir = tempfile::tempdir().unwrap();
        let ssh = dir.path().join(".ssh");
        ensure_ssh_dir(&ssh).unwrap();
        let mode = std::fs::metadata(&ssh).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn public_key_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("id_ed25519");
        std::fs::write(dir.path().join("id_ed25519.pub"), "ssh-ed25519 AAAA a@b\n").unwrap();
        let executor = MockExecutor::fail();
        let resource = SshKeyResource::new(key, "a@b", &executor);
        assert_eq!(resource.public_key().unwrap(), "ssh-ed25519 AAAA a@b");
    }
}
