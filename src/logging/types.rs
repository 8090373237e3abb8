//! Task outcomes as the run summary sees them, and the [`Log`] trait.

/// One line of the run summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name as shown in the summary.
    pub name: String,
    /// How the task ended.
    pub status: TaskStatus,
    /// Skip reason, error text, or item counts.
    pub message: Option<String>,
}

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Everything the task manages is in place.
    Ok,
    /// The task does not apply to this host.
    NotApplicable,
    /// Nothing to do, e.g. no git identity was provided.
    Skipped,
    /// Changes were only reported.
    DryRun,
    /// Some items (packages, files) failed while the rest were handled.
    Partial,
    /// The task stopped with an error.
    Failed,
}

impl TaskStatus {
    /// Short label used in the summary totals.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    /// Summary glyph and its ANSI colour.
    #[must_use]
    pub const fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::NotApplicable => ("·", "\x1b[2m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[37m"),
            Self::Partial => ("◐", "\x1b[35m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }

    /// Whether the task left something undone because of an error.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Partial | Self::Failed)
    }
}

/// Per-status totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    /// Tasks that ended [`TaskStatus::Ok`].
    pub ok: u32,
    /// Tasks that did not apply.
    pub not_applicable: u32,
    /// Tasks with nothing to do.
    pub skipped: u32,
    /// Tasks that only reported changes.
    pub dry_run: u32,
    /// Tasks where some items failed.
    pub partial: u32,
    /// Tasks that stopped with an error.
    pub failed: u32,
}

impl RunTally {
    /// Count `entries` by status.
    #[must_use]
    pub fn from_entries(entries: &[TaskEntry]) -> Self {
        let mut tally = Self::default();
        for entry in entries {
            let slot = match entry.status {
                TaskStatus::Ok => &mut tally.ok,
                TaskStatus::NotApplicable => &mut tally.not_applicable,
                TaskStatus::Skipped => &mut tally.skipped,
                TaskStatus::DryRun => &mut tally.dry_run,
                TaskStatus::Partial => &mut tally.partial,
                TaskStatus::Failed => &mut tally.failed,
            };
            *slot += 1;
        }
        tally
    }

    /// Number of tasks counted.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.ok + self.not_applicable + self.skipped + self.dry_run + self.partial + self.failed
    }

    /// Tasks that ended [`TaskStatus::Partial`] or [`TaskStatus::Failed`].
    #[must_use]
    pub const fn failures(&self) -> u32 {
        self.partial + self.failed
    }

    /// Totals line, coloured per status. Partial results only appear when
    /// there are any.
    #[must_use]
    pub fn render(&self) -> String {
        let mut parts = vec![
            (TaskStatus::Ok, self.ok),
            (TaskStatus::NotApplicable, self.not_applicable),
            (TaskStatus::Skipped, self.skipped),
            (TaskStatus::DryRun, self.dry_run),
        ];
        if self.partial > 0 {
            parts.push((TaskStatus::Partial, self.partial));
        }
        parts.push((TaskStatus::Failed, self.failed));
        let counts: Vec<String> = parts
            .into_iter()
            .map(|(status, n)| format!("{}{n} {}\x1b[0m", status.marker().1, status.label()))
            .collect();
        format!("{} tasks: {}", self.total(), counts.join(", "))
    }
}

/// Abstraction over logging backends.
///
/// Task code logs through this trait so tests can substitute an in-memory
/// recorder for the real [`Logger`](super::logger::Logger).
pub trait Log: Send + Sync {
    /// Log a stage header (one per task).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log what a dry run would have changed.
    fn dry_run(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
