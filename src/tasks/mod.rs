//! Named tasks executed strictly in order, each ensuring one feature.
pub mod backup;
pub mod cleanup;
mod context;
pub mod editor;
pub mod fonts;
pub mod git_config;
pub mod package_manager;
pub mod packages;
pub mod preferences;
mod processing;
pub mod shell;
pub mod ssh_key;
pub mod terminal;

pub use context::{Context, Selections};
pub use processing::{
    ProcessOpts, TaskResult, TaskStats, process_resource_states, process_resources,
};

use anyhow::Result;

use crate::error;
use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task should run on the current platform.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails, such as when a package cannot be
    /// installed or a file cannot be written.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the install command, in execution order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(preferences::CollectPreferences),
        Box::new(package_manager::InstallPackageManager),
        Box::new(packages::InstallPackages),
        Box::new(terminal::InstallTerminal),
        Box::new(terminal::ConfigureTerminalTheme),
        Box::new(fonts::InstallFont),
        Box::new(editor::InstallEditor),
        Box::new(shell::ConfigureShell),
        Box::new(git_config::ConfigureGit),
        Box::new(ssh_key::GenerateSshKey),
        Box::new(packages::RecordInstalledPackages),
        Box::new(backup::BackupDotfiles),
        Box::new(cleanup::CleanupStaleFiles),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// Every failure is logged and recorded. Only a fatal failure (see
/// [`error::is_fatal`]) is handed back so the caller can stop the run.
///
/// # Errors
///
/// Returns the task's error when it is fatal.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Ok(TaskResult::Partial(summary)) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Partial, Some(&summary));
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            if error::is_fatal(&e) {
                return Err(e);
            }
        }
    }
    Ok(())
}
