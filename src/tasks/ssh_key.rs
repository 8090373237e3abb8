//! ed25519 key generation.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::ssh_key::{KEY_TYPE, SshKeyResource};
use crate::resources::{Applicable as _, Resource as _, ResourceState};

/// Comment used when no git email was given.
const DEFAULT_COMMENT: &str = "bootstrap";

/// Where the operator is pointed to register the new key.
const KEYS_URL: &str = "https://github.com/settings/keys";

/// Generate an SSH key pair unless one already exists.
#[derive(Debug)]
pub struct GenerateSshKey;

impl Task for GenerateSshKey {
    fn name(&self) -> &'static str {
        "Generate SSH key"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let comment = ctx
            .selections()
            .git_email
            .clone()
            .unwrap_or_else(|| DEFAULT_COMMENT.to_string());
        let key = SshKeyResource::new(ctx.config.paths.ssh_key.clone(), comment, &*ctx.executor);

        match key.current_state()? {
            ResourceState::Correct => {
                ctx.log
                    .info(&format!("SSH key already exists: {}", key.path.display()));
                Ok(TaskResult::Ok)
            }
            ResourceState::Invalid { reason } => {
                ctx.log.warn(&format!("cannot generate SSH key: {reason}"));
                Ok(TaskResult::Skipped(reason))
            }
            ResourceState::Missing | ResourceState::Incorrect { .. } => {
                if ctx.dry_run {
                    ctx.log.dry_run(&format!(
                        "would generate {KEY_TYPE} key at {}",
                        key.path.display()
                    ));
                    return Ok(TaskResult::DryRun);
                }
                if !ctx.executor.which("ssh-keygen") {
                    return Ok(TaskResult::Skipped("ssh-keygen not found".to_string()));
                }
                key.apply()?;
                ctx.log.info(&format!("generated {}", key.description()));
                ctx.log.info(&key.public_key()?);
                ctx.log
                    .info(&format!("Add this public key to your git host (e.g. {KEYS_URL})"));
                Ok(TaskResult::Ok)
            }
        }
    }
}
