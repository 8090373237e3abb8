//! Copies generated dotfiles into the staging repository and publishes them.
use std::path::PathBuf;

use anyhow::Result;

use super::terminal::config_path;
use super::{Context, Task, TaskResult};
use crate::config::preferences::{Choice as _, Terminal};
use crate::resources::fs::copy_into;
use crate::resources::repository::{CommitOutcome, StagingRepository};

/// Commit message for every backup.
pub const COMMIT_MESSAGE: &str = "Back up dotfiles";

/// Files copied into the staging repository, in copy order.
///
/// The theme config is the selected terminal's when known, otherwise every
/// terminal config found on disk.
fn artifacts(ctx: &Context) -> Vec<PathBuf> {
    let paths = &ctx.config.paths;
    let terminals: Vec<Terminal> = match ctx.selections().terminal {
        Some(terminal) => vec![terminal],
        None => Terminal::ALL.to_vec(),
    };
    let mut files = vec![ctx.config.settings_file.clone()];
    files.extend(terminals.into_iter().map(|t| config_path(paths, t).clone()));
    files.push(paths.nvim_init.clone());
    files.push(paths.zshrc.clone());
    files
}

/// Copy generated dotfiles into the staging repository, commit, and push.
#[derive(Debug)]
pub struct BackupDotfiles;

impl Task for BackupDotfiles {
    fn name(&self) -> &'static str {
        "Back up dotfiles"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let backup = &ctx.config.backup;
        let existing: Vec<PathBuf> = artifacts(ctx).into_iter().filter(|p| p.is_file()).collect();

        if ctx.dry_run {
            for file in &existing {
                ctx.log.dry_run(&format!(
                    "would copy {} to {}",
                    file.display(),
                    backup.dir.display()
                ));
            }
            ctx.log.dry_run(&format!("would commit \"{COMMIT_MESSAGE}\""));
            if let Some(remote) = &backup.remote {
                ctx.log.dry_run(&format!("would push to {remote}"));
            }
            return Ok(TaskResult::DryRun);
        }

        let repo = StagingRepository::open_or_init(&backup.dir, backup.remote.as_deref())?;
        for file in &existing {
            copy_into(file, repo.dir())?;
            ctx.log.debug(&format!("copied {}", file.display()));
        }

        match repo.commit_all(COMMIT_MESSAGE)? {
            CommitOutcome::Committed { id } => ctx.log.info(&format!("committed {id}")),
            CommitOutcome::NothingToCommit => ctx.log.info("nothing to commit"),
        }

        match repo.remote_url() {
            Some(remote) => {
                repo.push(&*ctx.executor)?;
                ctx.log.info(&format!("pushed to {remote}"));
            }
            None => ctx.log.info("no backup remote configured, skipping push"),
        }
        Ok(TaskResult::Ok)
    }
}
