//! Housekeeping for the cleanup directory.
use std::time::SystemTime;

use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resource_states};
use crate::resources::ResourceState;
use crate::resources::stale_file::{MAX_AGE_DAYS, stale_files};

/// Remove files older than a week from the cleanup directory.
#[derive(Debug)]
pub struct CleanupStaleFiles;

impl Task for CleanupStaleFiles {
    fn name(&self) -> &'static str {
        "Clean up stale files"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let dir = &ctx.config.cleanup_dir;
        if !dir.is_dir() {
            return Ok(TaskResult::Skipped(format!(
                "{} does not exist",
                dir.display()
            )));
        }

        let stale = stale_files(dir, SystemTime::now(), MAX_AGE_DAYS)?;
        ctx.log.debug(&format!(
            "{} files older than {MAX_AGE_DAYS} days in {}",
            stale.len(),
            dir.display()
        ));
        let states = stale.into_iter().map(|file| {
            let current = format!("{} days old", file.age_days);
            (file, ResourceState::Incorrect { current })
        });
        process_resource_states(ctx, states, &ProcessOpts::apply_all("remove").no_bail())
    }
}
