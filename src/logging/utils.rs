//! Utility functions for path resolution, ANSI stripping, and time formatting.
use std::path::{Path, PathBuf};

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range), so cursor movement, erase, etc.
/// are also stripped without consuming unrelated text.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Return the default log directory: `$XDG_CACHE_HOME/bootstrap/`
/// (or `~/.cache/bootstrap/`).
#[must_use]
pub fn default_log_dir(home: &Path) -> PathBuf {
    std::env::var("XDG_CACHE_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map_or_else(|| home.join(".cache"), PathBuf::from)
        .join("bootstrap")
}

/// Return the append-only log file path inside `log_dir`.
#[must_use]
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join("bootstrap.log")
}

/// Return the installed-package listing path inside `log_dir`.
#[must_use]
pub fn installed_packages_path(log_dir: &Path) -> PathBuf {
    log_dir.join("installed-packages.txt")
}

/// Format the current local time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_local_datetime() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
