//! Stale download cleanup.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::{Applicable, ResourceChange};

/// Files whose age in whole days exceeds this are removed.
pub const MAX_AGE_DAYS: u64 = 7;

const SECS_PER_DAY: u64 = 86_400;

/// Age of a file in whole days, rounding down. Files dated in the future
/// are zero days old.
#[must_use]
pub fn age_in_days(modified: SystemTime, now: SystemTime) -> u64 {
    now.duration_since(modified)
        .unwrap_or(Duration::ZERO)
        .as_secs()
        / SECS_PER_DAY
}

/// Regular files directly inside `dir` older than `max_age_days` whole days,
/// sorted by path.
///
/// Subdirectories are neither descended into nor returned. A missing `dir`
/// yields an empty list.
///
/// # Errors
///
/// Returns an error if `dir` exists but cannot be listed.
pub fn stale_files(
    dir: &Path,
    now: SystemTime,
    max_age_days: u64,
) -> Result<Vec<StaleFileResource>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut stale = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let Ok(modified) = meta.modified() else {
            continue;
        };
        let age_days = age_in_days(modified, now);
        if age_days > max_age_days {
            stale.push(StaleFileResource {
                path: entry.path(),
                age_days,
            });
        }
    }
    stale.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(stale)
}

/// A stale file scheduled for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleFileResource {
    /// File to delete.
    pub path: PathBuf,
    /// Whole days since last modification.
    pub age_days: u64,
}

impl Applicable for StaleFileResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(ResourceChange::Applied),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ResourceChange::Skipped {
                reason: "already removed".to_string(),
            }),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }
}
