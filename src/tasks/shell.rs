//! zsh, zinit, `.zshrc`, and the login shell.
use anyhow::Result;

use super::packages::ensure_package;
use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::config::preferences::PromptStyle;
use crate::resources::Resource;
use crate::resources::checkout::GitCheckoutResource;
use crate::resources::config_file::ConfigFileResource;
use crate::resources::package::PackageRequest;
use crate::resources::shell::DefaultShellResource;
use crate::templates::render_zshrc;

/// Plugin manager cloned into the zinit directory.
pub const ZINIT_URL: &str = "https://github.com/zdharma-continuum/zinit.git";

/// Install zsh, write `.zshrc`, and make zsh the login shell.
#[derive(Debug)]
pub struct ConfigureShell;

impl Task for ConfigureShell {
    fn name(&self) -> &'static str {
        "Configure shell"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let options = ctx.selections().shell_options();

        if !ctx.executor.which("zsh") {
            ensure_package(ctx, &PackageRequest::new("zsh"))?;
        }
        // The prompt binary is optional; the rest of the shell setup goes ahead.
        let mut prompt_failed = false;
        if options.prompt_style == PromptStyle::Starship
            && !ctx.executor.which("starship")
            && let Err(e) = ensure_package(ctx, &PackageRequest::new("starship"))
        {
            ctx.log.error(&format!("prompt binary not installed: {e}"));
            prompt_failed = true;
        }

        let paths = &ctx.config.paths;
        let zinit = GitCheckoutResource::new(ZINIT_URL, paths.zinit_dir.clone(), &*ctx.executor);
        let zshrc = ConfigFileResource::new(paths.zshrc.clone(), render_zshrc(&options))
            .with_backup(paths.zshrc_backup.clone());
        let login = DefaultShellResource::new("zsh", ctx.login_shell.clone(), &*ctx.executor);

        let mut resources: Vec<&dyn Resource> = vec![&zinit, &zshrc];
        if ctx.ci {
            ctx.log.info("skipping login shell change in CI");
        } else {
            resources.push(&login);
        }
        let result =
            process_resources(ctx, resources, &ProcessOpts::apply_all("configure").no_bail())?;
        if !prompt_failed {
            return Ok(result);
        }
        Ok(match result {
            TaskResult::Partial(summary) => {
                TaskResult::Partial(format!("starship missing; {summary}"))
            }
            _ => TaskResult::Partial("starship missing".to_string()),
        })
    }
}
