//! Makes sure the platform's package manager is usable.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::error::InstallError;
use crate::platform::PackageManager;

/// Official Homebrew installer script.
pub const HOMEBREW_INSTALL_URL: &str =
    "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Make sure the platform's package manager is usable.
///
/// Only Homebrew can be installed from here; a Linux host without its
/// distribution package manager is reported as an error.
#[derive(Debug)]
pub struct InstallPackageManager;

impl Task for InstallPackageManager {
    fn name(&self) -> &'static str {
        "Install package manager"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let manager = ctx.backend.manager();
        if ctx.backend.is_available() {
            ctx.log.info(&format!("{manager} already installed"));
            return Ok(TaskResult::Ok);
        }

        if manager != PackageManager::Brew {
            return Err(InstallError::PackageManagerMissing { manager }.into());
        }

        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would install Homebrew from {HOMEBREW_INSTALL_URL}"));
            return Ok(TaskResult::DryRun);
        }

        install_homebrew(ctx)?;
        if !ctx.backend.is_available() {
            ctx.log.warn(
                "Homebrew installed but brew is not on PATH; add /opt/homebrew/bin to PATH and re-run",
            );
        }
        Ok(TaskResult::Ok)
    }
}

/// Download the installer and run it unattended.
fn install_homebrew(ctx: &Context) -> Result<()> {
    ctx.log.info("downloading Homebrew installer");
    let script = ureq::get(HOMEBREW_INSTALL_URL)
        .call()
        .context("downloading Homebrew installer")?
        .body_mut()
        .read_to_string()
        .context("reading Homebrew installer")?;

    let path = std::env::temp_dir().join("homebrew-install.sh");
    std::fs::write(&path, script)
        .with_context(|| format!("writing {}", path.display()))?;
    let path_str = path.to_string_lossy();

    ctx.log.info("running Homebrew installer");
    let result = ctx
        .executor
        .run_with_env("bash", &[&path_str], &[("NONINTERACTIVE", "1")])
        .context("running Homebrew installer");
    std::fs::remove_file(&path).ok();
    result?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::{FakeSystem, TestEnv};

    #[test]
    fn available_manager_is_left_alone() {
        let env = TestEnv::new(PackageManager::Brew);
        let result = InstallPackageManager.run(&env.ctx).unwrap();
        assert!(matches!(result, TaskResult::Ok));
        assert!(env.system.mutating_calls().is_empty());
    }

    #[test]
    fn missing_linux_manager_is_an_error() {
        let env = TestEnv::with_system(PackageManager::Apt, FakeSystem::new());
        let err = InstallPackageManager.run(&env.ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::PackageManagerMissing {
                manager: PackageManager::Apt
            })
        ));
    }

    #[test]
    fn missing_brew_in_dry_run_only_logs() {
        let env = TestEnv::with_system(PackageManager::Brew, FakeSystem::new()).dry_run();
        let result = InstallPackageManager.run(&env.ctx).unwrap();
        assert!(matches!(result, TaskResult::DryRun));
        assert!(env.system.calls().is_empty());
        assert!(env.log.dry_run_lines()[0].contains("would install Homebrew"));
    }
}
