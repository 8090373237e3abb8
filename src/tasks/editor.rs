//! Neovim and its init file.
use anyhow::Result;

use super::packages::ensure_package;
use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::config_file::ConfigFileResource;
use crate::resources::package::PackageRequest;
use crate::templates::render_nvim_init;

/// Install Neovim and write its init file.
#[derive(Debug)]
pub struct InstallEditor;

impl Task for InstallEditor {
    fn name(&self) -> &'static str {
        "Install editor"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.executor.which("nvim") {
            ctx.log.debug("nvim already on PATH");
        } else {
            ensure_package(ctx, &PackageRequest::new("neovim"))?;
        }

        let options = ctx.selections().editor_options();
        let init = ConfigFileResource::new(
            ctx.config.paths.nvim_init.clone(),
            render_nvim_init(&options),
        );
        process_resources(ctx, [init], &ProcessOpts::apply_all("write"))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::platform::PackageManager;
    use crate::tasks::test_helpers::{FakeSystem, TestEnv};

    #[test]
    fn installs_neovim_and_writes_init() {
        let env = TestEnv::new(PackageManager::Pacman);
        InstallEditor.run(&env.ctx).unwrap();
        assert_eq!(env.system.mutating_calls(), vec![
            "sudo pacman -S --needed --noconfirm neovim"
        ]);
        let init = std::fs::read_to_string(&env.ctx.config.paths.nvim_init).unwrap();
        assert!(init.contains("number"));
    }

    #[test]
    fn existing_nvim_is_not_queried() {
        let env = TestEnv::with_system(
            PackageManager::Apt,
            FakeSystem::new().with_binary("apt-get").with_binary("nvim"),
        );
        InstallEditor.run(&env.ctx).unwrap();
        assert!(env.system.calls().is_empty());
    }

    #[test]
    fn failed_install_leaves_config_untouched() {
        let env = TestEnv::with_system(
            PackageManager::Apt,
            FakeSystem::new()
                .with_binary("apt-get")
                .failing_install("neovim"),
        );
        assert!(InstallEditor.run(&env.ctx).is_err());
        assert!(!env.ctx.config.paths.nvim_init.exists());
    }
}
