//! Single-package installs and the configured package list.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resource_states};
use crate::error::InstallError;
use crate::logging::installed_packages_path;
use crate::platform::PackageManager;
use crate::resources::fs::write_atomic;
use crate::resources::package::{PackageRequest, PackageResource};
use crate::resources::{Applicable as _, ResourceState};

/// What [`ensure_package`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The package was absent and has been installed.
    Installed,
    /// The package was already present; nothing ran.
    AlreadyPresent,
    /// The package is absent; the install was only logged.
    DryRun,
}

impl InstallOutcome {
    /// Task result matching this outcome.
    #[must_use]
    pub const fn task_result(self) -> TaskResult {
        match self {
            Self::Installed | Self::AlreadyPresent => TaskResult::Ok,
            Self::DryRun => TaskResult::DryRun,
        }
    }
}

/// Make one package present through the run's backend.
///
/// The presence check never mutates. In dry-run an absent package is only
/// logged. Every outcome is logged.
///
/// # Errors
///
/// Returns [`InstallError`] if the query or the install fails, including the
/// Homebrew cask fallback.
pub fn ensure_package(
    ctx: &Context,
    request: &PackageRequest,
) -> Result<InstallOutcome, InstallError> {
    let resource = PackageResource::new(request.clone(), &*ctx.backend);
    let desc = resource.description();

    if ctx.backend.is_installed(request)? {
        ctx.log.info(&format!("already installed: {desc}"));
        return Ok(InstallOutcome::AlreadyPresent);
    }
    if ctx.dry_run {
        ctx.log.dry_run(&format!("would install {desc}"));
        return Ok(InstallOutcome::DryRun);
    }
    ctx.log.info(&format!("installing {desc}"));
    ctx.backend.install(request)?;
    ctx.log.info(&format!("installed {desc}"));
    Ok(InstallOutcome::Installed)
}

/// Base packages and, on Homebrew, casks from the settings file.
fn configured_requests(ctx: &Context) -> Vec<PackageRequest> {
    let mut requests: Vec<_> = ctx
        .config
        .packages
        .iter()
        .map(PackageRequest::new)
        .collect();
    if ctx.platform.manager == PackageManager::Brew {
        requests.extend(ctx.config.casks.iter().map(PackageRequest::cask));
    } else if !ctx.config.casks.is_empty() {
        ctx.log.debug(&format!(
            "ignoring {} casks on {}",
            ctx.config.casks.len(),
            ctx.platform.manager
        ));
    }
    requests
}

/// Install the configured package list.
///
/// Queries all installed packages **once**, then installs only the missing
/// ones. A failing package is logged and the rest of the list continues.
#[derive(Debug)]
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.packages.is_empty()
            || (ctx.platform.manager == PackageManager::Brew && !ctx.config.casks.is_empty())
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let manager = ctx.backend.manager();
        if !ctx.backend.is_available() {
            if ctx.dry_run {
                return Ok(TaskResult::Skipped(format!("{manager} not installed yet")));
            }
            return Err(InstallError::PackageManagerMissing { manager }.into());
        }

        let requests = configured_requests(ctx);
        ctx.log.debug(&format!(
            "batch-checking {} packages with a single query",
            requests.len()
        ));
        let installed = ctx.backend.list_installed()?;

        let resource_states: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let resource = PackageResource::new(request, &*ctx.backend);
                let state = resource.state_from_installed(&installed);
                (resource, state)
            })
            .collect();

        let any_missing = resource_states
            .iter()
            .any(|(_, state)| *state == ResourceState::Missing);
        if any_missing
            && !ctx.dry_run
            && let Err(e) = ctx.backend.refresh()
        {
            ctx.log.warn(&format!("package index refresh failed: {e}"));
        }

        process_resource_states(
            ctx,
            resource_states,
            &ProcessOpts::install_missing("install"),
        )
    }
}

/// Write the backend's installed-package listing next to the log file.
#[derive(Debug)]
pub struct RecordInstalledPackages;

impl Task for RecordInstalledPackages {
    fn name(&self) -> &'static str {
        "Record installed packages"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let path = installed_packages_path(&ctx.config.paths.log_dir);
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would write package list to {}", path.display()));
            return Ok(TaskResult::DryRun);
        }
        if !ctx.backend.is_available() {
            return Ok(TaskResult::Skipped(format!(
                "{} not installed",
                ctx.backend.manager()
            )));
        }

        let mut names: Vec<_> = ctx.backend.list_installed()?.into_iter().collect();
        names.sort();
        let mut content = names.join("\n");
        content.push('\n');
        write_atomic(&path, &content)?;
        ctx.log.info(&format!(
            "recorded {} packages in {}",
            names.len(),
            path.display()
        ));
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::{FakeSystem, TestEnv};

    #[test]
    fn ensure_package_installs_when_absent() {
        let env = TestEnv::new(PackageManager::Apt);
        let outcome = ensure_package(&env.ctx, &PackageRequest::new("neovim")).unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);
        assert!(env.system.is_installed("neovim"));
        assert_eq!(env.system.mutating_calls(), vec![
            "sudo apt-get install -y neovim"
        ]);
    }

    #[test]
    fn ensure_package_is_noop_when_present() {
        let env = TestEnv::with_system(
            PackageManager::Pacman,
            FakeSystem::new().with_binary("pacman").with_package("zsh"),
        );
        let outcome = ensure_package(&env.ctx, &PackageRequest::new("zsh")).unwrap();
        assert_eq!(outcome, InstallOutcome::AlreadyPresent);
        assert!(env.system.mutating_calls().is_empty());
        assert!(env.log.contains("already installed: zsh (pacman)"));
    }

    #[test]
    fn ensure_package_dry_run_only_logs() {
        let env = TestEnv::new(PackageManager::Brew).dry_run();
        let outcome = ensure_package(&env.ctx, &PackageRequest::new("tmux")).unwrap();
        assert_eq!(outcome, InstallOutcome::DryRun);
        assert!(env.system.mutating_calls().is_empty());
        assert_eq!(env.log.dry_run_lines(), vec!["would install tmux (brew)"]);
    }

    #[test]
    fn ensure_package_surfaces_cask_fallback_failure() {
        let env = TestEnv::with_system(
            PackageManager::Brew,
            FakeSystem::new().with_binary("brew").failing_install("nope"),
        );
        let err = ensure_package(&env.ctx, &PackageRequest::new("nope")).unwrap_err();
        assert!(matches!(err, InstallError::CaskFallbackFailed { .. }), "{err}");
        assert_eq!(env.system.mutating_calls(), vec![
            "brew install nope",
            "brew install --cask nope"
        ]);
    }

    #[test]
    fn install_packages_installs_only_missing() {
        let env = TestEnv::with_system(
            PackageManager::Apt,
            FakeSystem::new().with_binary("apt-get").with_package("git"),
        )
        .with_config(|c| c.packages = vec!["git".into(), "tmux".into()]);
        let result = InstallPackages.run(&env.ctx).unwrap();
        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(env.system.mutating_calls(), vec![
            "sudo apt-get update",
            "sudo apt-get install -y tmux"
        ]);
    }

    #[test]
    fn install_packages_continues_after_failure() {
        let env = TestEnv::with_system(
            PackageManager::Pacman,
            FakeSystem::new().with_binary("pacman").failing_install("broken"),
        )
        .with_config(|c| c.packages = vec!["broken".into(), "tmux".into()]);
        let result = InstallPackages.run(&env.ctx).unwrap();
        assert!(matches!(result, TaskResult::Partial(_)));
        assert!(env.system.is_installed("tmux"));
        let errors = env.log.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("failed to install broken (pacman)"));
    }

    #[test]
    fn failed_install_is_reported_in_summary() {
        let env = TestEnv::with_system(
            PackageManager::Apt,
            FakeSystem::new().with_binary("apt-get").failing_install("tmux"),
        )
        .with_config(|c| c.packages = vec!["git".into(), "tmux".into()]);
        crate::tasks::execute(&InstallPackages, &env.ctx).unwrap();
        assert_eq!(
            env.log.status_of("Install packages"),
            Some(crate::logging::TaskStatus::Partial)
        );
        assert!(env.log.errors().iter().any(|e| e.contains("tmux")));
        assert!(env.system.is_installed("git"));
    }

    #[test]
    fn casks_are_only_requested_on_brew() {
        let env = TestEnv::new(PackageManager::Brew)
            .with_config(|c| {
                c.packages = vec![];
                c.casks = vec!["rectangle".into()];
            });
        assert!(InstallPackages.should_run(&env.ctx));
        InstallPackages.run(&env.ctx).unwrap();
        assert!(
            env.system
                .mutating_calls()
                .contains(&"brew install --cask rectangle".to_string())
        );

        let env = TestEnv::new(PackageManager::Apt).with_config(|c| {
            c.packages = vec![];
            c.casks = vec!["rectangle".into()];
        });
        assert!(!InstallPackages.should_run(&env.ctx));
    }

    #[test]
    fn missing_backend_fails_unless_dry_run() {
        let env = TestEnv::with_system(PackageManager::Apt, FakeSystem::new());
        let err = InstallPackages.run(&env.ctx).unwrap_err();
        assert!(err.to_string().contains("apt"));

        let env = TestEnv::with_system(PackageManager::Apt, FakeSystem::new()).dry_run();
        assert!(matches!(
            InstallPackages.run(&env.ctx).unwrap(),
            TaskResult::Skipped(_)
        ));
    }

    #[test]
    fn record_installed_packages_writes_sorted_list() {
        let env = TestEnv::with_system(
            PackageManager::Yay,
            FakeSystem::new()
                .with_binary("yay")
                .with_package("zsh")
                .with_package("git"),
        );
        RecordInstalledPackages.run(&env.ctx).unwrap();
        let path = installed_packages_path(&env.ctx.config.paths.log_dir);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "git\nzsh\n");
    }

    #[test]
    fn record_installed_packages_dry_run_writes_nothing() {
        let env = TestEnv::new(PackageManager::Apt).dry_run();
        let result = RecordInstalledPackages.run(&env.ctx).unwrap();
        assert!(matches!(result, TaskResult::DryRun));
        assert!(env.files().is_empty());
    }
}
