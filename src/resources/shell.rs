//! Login shell resource.
use anyhow::{Context as _, Result};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// The operator's login shell.
///
/// The current shell is passed in rather than read from the environment so
/// callers decide where it comes from (`$SHELL` in production).
#[derive(Debug)]
pub struct DefaultShellResource<'a> {
    /// Target shell name (e.g., "zsh").
    target_shell: String,
    /// Login shell path as currently configured, possibly empty.
    current_shell: String,
    executor: &'a dyn Executor,
}

impl<'a> DefaultShellResource<'a> {
    /// Create a new default shell resource.
    #[must_use]
    pub fn new(
        target_shell: impl Into<String>,
        current_shell: impl Into<String>,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            target_shell: target_shell.into(),
            current_shell: current_shell.into(),
            executor,
        }
    }
}

impl Applicable for DefaultShellResource<'_> {
    fn description(&self) -> String {
        format!("default shell → {}", self.target_shell)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let result = self.executor.run("which", &[&self.target_shell])?;
        let shell_path = result.stdout.trim();
        if shell_path.is_empty() {
            anyhow::bail!("{} not found on PATH", self.target_shell);
        }
        self.executor
            .run("chsh", &["-s", shell_path])
            .with_context(|| format!("changing login shell to {shell_path}"))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DefaultShellResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let suffix = format!("/{}", self.target_shell);
        if self.current_shell.ends_with(&suffix) {
            Ok(ResourceState::Correct)
        } else if self.current_shell.is_empty() {
            Ok(ResourceState::Missing)
        } else {
            Ok(ResourceState::Incorrect {
                current: self.current_shell.clone(),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn description_includes_shell_name() {
        let executor = MockExecutor::fail();
        let resource = DefaultShellResource::new("zsh", "", &executor);
        assert_eq!(resource.description(), "default shell → zsh");
    }

    #[test]
    fn current_state_correct_when_shell_matches() {
        let executor = MockExecutor::fail();
        let resource = DefaultShellResource::new("zsh", "/usr/bin/zsh", &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn current_state_missing_when_unset() {
        let executor = MockExecutor::fail();
        let resource = DefaultShellResource::new("zsh", "", &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn current_state_incorrect_when_different_shell_set() {
        let executor = MockExecutor::fail();
        let resource = DefaultShellResource::new("zsh", "/bin/bash", &executor);
        let state = resource.current_state().unwrap();
        assert!(
            matches!(state, ResourceState::Incorrect { ref current } if current == "/bin/bash"),
            "expected Incorrect(/bin/bash), got {state:?}"
        );
    }

    #[test]
    fn suffix_match_is_on_whole_name() {
        let executor = MockExecutor::fail();
        let resource = DefaultShellResource::new("zsh", "/usr/local/bin/notzsh", &executor);
        assert!(matches!(
            resource.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[test]
    fn apply_resolves_path_then_runs_chsh() {
        let executor = MockExecutor::with_responses(vec![
            (true, "/usr/bin/zsh\n".to_string()),
            (true, String::new()),
        ]);
        let resource = DefaultShellResource::new("zsh", "/bin/bash", &executor);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(executor.calls(), vec!["which zsh", "chsh -s /usr/bin/zsh"]);
    }
}
