//! The `install` subcommand.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::{GlobalOpts, InstallOpts};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::tasks::{self, Task};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if platform detection or settings loading fails, or if a
/// task fails fatally.
pub fn run(
    global: &GlobalOpts,
    opts: &InstallOpts,
    log: &Arc<Logger>,
    home: &std::path::Path,
) -> Result<()> {
    log.info(&format!("bootstrap {}", super::version::version()));

    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let setup = CommandSetup::init(global, home, &*executor, log)?;
    let ctx = setup.into_context(global, executor, Arc::clone(log) as Arc<dyn Log>);
    if ctx.dry_run {
        log.dry_run("no changes will be made");
    }

    let all_tasks = tasks::all_install_tasks();
    run_tasks_to_completion(select_tasks(&all_tasks, opts), &ctx, log)
}

/// Apply `--only` (takes precedence) or `--skip` by case-insensitive name
/// substring.
#[must_use]
pub fn select_tasks<'a>(all: &'a [Box<dyn Task>], opts: &InstallOpts) -> Vec<&'a dyn Task> {
    all.iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !opts.only.is_empty() {
                return opts.only.iter().any(|o| name.contains(&o.to_lowercase()));
            }
            if !opts.skip.is_empty() {
                return !opts.skip.iter().any(|s| name.contains(&s.to_lowercase()));
            }
            true
        })
        .map(AsRef::as_ref)
        .collect()
}
