//! In-memory [`Log`] implementation for unit tests.
use std::sync::Mutex;

use super::types::{Log, TaskEntry, TaskStatus};

/// A single captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    Stage(String),
    Info(String),
    Debug(String),
    Warn(String),
    Error(String),
    DryRun(String),
}

impl LogLine {
    /// The message text regardless of level.
    pub fn message(&self) -> &str {
        match self {
            Self::Stage(m)
            | Self::Info(m)
            | Self::Debug(m)
            | Self::Warn(m)
            | Self::Error(m)
            | Self::DryRun(m) => m,
        }
    }
}

/// Captures every log call so tests can assert on levels and messages.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<LogLine>>,
    tasks: Mutex<Vec<TaskEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: LogLine) {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(line);
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Messages logged through [`Log::dry_run`].
    pub fn dry_run_lines(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| match l {
                LogLine::DryRun(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Messages logged through [`Log::error`].
    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| match l {
                LogLine::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Whether any message at any level contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.message().contains(needle))
    }

    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Status recorded for the task called `name`, if any.
    pub fn status_of(&self, name: &str) -> Option<TaskStatus> {
        self.task_entries()
            .into_iter()
            .find(|t| t.name == name)
            .map(|t| t.status)
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push(LogLine::Stage(msg.to_string()));
    }

    fn info(&self, msg: &str) {
        self.push(LogLine::Info(msg.to_string()));
    }

    fn debug(&self, msg: &str) {
        self.push(LogLine::Debug(msg.to_string()));
    }

    fn warn(&self, msg: &str) {
        self.push(LogLine::Warn(msg.to_string()));
    }

    fn error(&self, msg: &str) {
        self.push(LogLine::Error(msg.to_string()));
    }

    fn dry_run(&self, msg: &str) {
        self.push(LogLine::DryRun(msg.to_string()));
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
    }
}
