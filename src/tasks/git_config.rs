//! Global git identity.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::git_config::GitConfigResource;

/// Set the global git identity from the collected answers.
#[derive(Debug)]
pub struct ConfigureGit;

impl Task for ConfigureGit {
    fn name(&self) -> &'static str {
        "Configure git"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.executor.which("git")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let (name, email) = {
            let selections = ctx.selections();
            (selections.git_name.clone(), selections.git_email.clone())
        };
        let entries: Vec<_> = [("user.name", name), ("user.email", email)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();
        if entries.is_empty() {
            return Ok(TaskResult::Skipped("no git identity provided".to_string()));
        }

        let resources = entries
            .into_iter()
            .map(|(key, value)| GitConfigResource::new(key.to_string(), value, &*ctx.executor));
        process_resources(ctx, resources, &ProcessOpts::apply_all("set"))
    }
}
