//! Generic resource processing loop: check state, apply, collect stats.
use anyhow::Result;

use super::Context;
use crate::resources::{Applicable, Resource, ResourceChange, ResourceState};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use bootstrap_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("no remote configured".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped (nothing to do on this host).
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
    /// Some items failed; the rest were handled. Carries the item counts.
    Partial(String),
}

/// Counters for batch tasks that process many items.
///
/// # Examples
///
/// ```
/// use bootstrap_cli::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3, failed: 0 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped");
/// assert_eq!(stats.summary(true), "1 would change, 2 already ok, 3 skipped");
///
/// let stats = TaskStats { failed: 1, ..TaskStats::default() };
/// assert_eq!(stats.summary(false), "0 changed, 0 already ok, 1 failed");
/// ```
#[derive(Debug, Default)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items skipped as inapplicable.
    pub skipped: u32,
    /// Number of items whose change failed.
    pub failed: u32,
}

impl TaskStats {
    /// All counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut line = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            line.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.failed > 0 {
            line.push_str(&format!(", {} failed", self.failed));
        }
        line
    }

    /// Log the summary and return the appropriate `TaskResult`.
    ///
    /// Any failed item turns the result into [`TaskResult::Partial`].
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        let summary = self.summary(ctx.dry_run);
        ctx.log.info(&summary);
        if self.failed > 0 {
            TaskResult::Partial(summary)
        } else if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// How each [`ResourceState`] is handled by the processing loop.
///
/// # Examples
///
/// ```
/// use bootstrap_cli::tasks::ProcessOpts;
///
/// let opts = ProcessOpts::apply_all("write");
/// assert!(opts.fix_incorrect && opts.fix_missing && opts.bail_on_error);
///
/// let opts = ProcessOpts::install_missing("install");
/// assert!(!opts.fix_incorrect && opts.fix_missing && !opts.bail_on_error);
///
/// let opts = ProcessOpts::apply_all("remove").skip_missing().no_bail();
/// assert!(opts.fix_incorrect && !opts.fix_missing && !opts.bail_on_error);
/// ```
#[derive(Debug)]
pub struct ProcessOpts<'a> {
    /// Verb for log messages (e.g., "install", "write", "remove").
    pub verb: &'a str,
    /// Treat `Incorrect` as fixable (apply the change). If `false`, skip it.
    pub fix_incorrect: bool,
    /// Treat `Missing` as fixable (apply the change). If `false`, skip it.
    pub fix_missing: bool,
    /// Propagate errors from `apply()` (bail). If `false`, log the error and
    /// count the item as failed.
    pub bail_on_error: bool,
}

impl<'a> ProcessOpts<'a> {
    /// Fix both missing and incorrect resources, bailing on errors.
    #[must_use]
    pub const fn apply_all(verb: &'a str) -> Self {
        Self {
            verb,
            fix_incorrect: true,
            fix_missing: true,
            bail_on_error: true,
        }
    }

    /// Install only missing resources, continuing past failed installs.
    #[must_use]
    pub const fn install_missing(verb: &'a str) -> Self {
        Self {
            verb,
            fix_incorrect: false,
            fix_missing: true,
            bail_on_error: false,
        }
    }

    /// Continue past failed items instead of bailing.
    #[must_use]
    pub const fn no_bail(mut self) -> Self {
        self.bail_on_error = false;
        self
    }

    /// Skip missing resources (only fix incorrect ones).
    #[must_use]
    pub const fn skip_missing(mut self) -> Self {
        self.fix_missing = false;
        self
    }
}

/// Check each resource's own state and apply as needed.
///
/// # Errors
///
/// Returns an error if a state check fails, or if an apply fails while
/// `opts.bail_on_error` is set.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for resource in resources {
        let current = resource.current_state()?;
        stats += process_single(ctx, &resource, current, opts)?;
    }
    Ok(stats.finish(ctx))
}

/// Process resources whose states were computed by one bulk query.
///
/// # Errors
///
/// Returns an error if an apply fails while `opts.bail_on_error` is set.
pub fn process_resource_states<R: Applicable>(
    ctx: &Context,
    resource_states: impl IntoIterator<Item = (R, ResourceState)>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for (resource, current) in resource_states {
        stats += process_single(ctx, &resource, current, opts)?;
    }
    Ok(stats.finish(ctx))
}

/// Process a single resource given its current state, returning a stats delta.
fn process_single<R: Applicable>(
    ctx: &Context,
    resource: &R,
    resource_state: ResourceState,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match resource_state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
        ResourceState::Missing if !opts.fix_missing => {
            delta.skipped += 1;
        }
        ResourceState::Incorrect { .. } if !opts.fix_incorrect => {
            ctx.log.debug(&format!("skipping {desc} (unexpected state)"));
            delta.skipped += 1;
        }
        resource_state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if ctx.dry_run {
                let msg = if let ResourceState::Incorrect { ref current } = resource_state {
                    format!("would {} {desc} (currently {current})", opts.verb)
                } else {
                    format!("would {}: {desc}", opts.verb)
                };
                ctx.log.dry_run(&msg);
                delta.changed += 1;
                return Ok(delta);
            }
            delta += apply_resource(ctx, resource, opts)?;
        }
    }
    Ok(delta)
}

/// Apply a single resource change, returning a stats delta.
fn apply_resource<R: Applicable>(
    ctx: &Context,
    resource: &R,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    let change = match resource.apply() {
        Ok(change) => change,
        Err(e) => {
            if opts.bail_on_error {
                return Err(e);
            }
            ctx.log.error(&format!("failed to {} {desc}: {e:#}", opts.verb));
            delta.failed += 1;
            return Ok(delta);
        }
    };

    match change {
        ResourceChange::Applied => {
            ctx.log.info(&format!("{}: {desc}", opts.verb));
            delta.changed += 1;
        }
        ResourceChange::AlreadyCorrect => {
            delta.already_ok += 1;
        }
        ResourceChange::Skipped { reason } => {
            ctx.log.debug(&format!("skipped {desc}: {reason}"));
            delta.skipped += 1;
        }
    }
    Ok(delta)
}
