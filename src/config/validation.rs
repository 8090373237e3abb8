//! Non-fatal configuration checks reported before any task runs.
use std::collections::HashSet;

use super::Config;
use crate::platform::{PackageManager, Platform};

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The settings section (e.g., "packages", "backup").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl Config {
    /// Check the resolved configuration for likely mistakes.
    #[must_use]
    pub fn validate(&self, platform: &Platform) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        check_package_list(&mut warnings, "packages", &self.packages);
        check_package_list(&mut warnings, "casks", &self.casks);

        if !self.casks.is_empty() && platform.manager != PackageManager::Brew {
            warnings.push(ValidationWarning::new(
                "casks",
                self.casks.join(", "),
                format!("casks are ignored by {}", platform.manager),
            ));
        }

        if self.backup.dir == self.cleanup_dir {
            warnings.push(ValidationWarning::new(
                "backup",
                self.backup.dir.display().to_string(),
                "staging directory is also swept for stale files",
            ));
        }

        warnings
    }
}

fn check_package_list(warnings: &mut Vec<ValidationWarning>, source: &str, names: &[String]) {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            warnings.push(ValidationWarning::new(source, "", "empty package name"));
        } else if name.chars().any(char::is_whitespace) {
            warnings.push(ValidationWarning::new(
                source,
                name,
                "package name contains whitespace",
            ));
        } else if !seen.insert(name.as_str()) {
            warnings.push(ValidationWarning::new(source, name, "listed more than once"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::platform::OsKind;
    use std::path::Path;

    #[test]
    fn default_config_has_no_warnings() {
        let config = Config::defaults(Path::new("/home/ada"));
        let platform = Platform::new(OsKind::MacOs, PackageManager::Brew);
        assert!(config.validate(&platform).is_empty());
    }

    #[test]
    fn duplicate_and_blank_packages_warn() {
        let mut config = Config::defaults(Path::new("/home/ada"));
        config.packages = vec!["git".into(), "git".into(), " ".into(), "a b".into()];
        let platform = Platform::new(OsKind::DebianLike, PackageManager::Apt);
        let warnings = config.validate(&platform);
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.message == "listed more than once"));
        assert!(warnings.iter().any(|w| w.message == "empty package name"));
    }

    #[test]
    fn casks_outside_brew_warn() {
        let mut config = Config::defaults(Path::new("/home/ada"));
        config.casks = vec!["rectangle".into()];
        let platform = Platform::new(OsKind::ArchLike, PackageManager::Pacman);
        let warnings = config.validate(&platform);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source, "casks");
        assert!(warnings[0].message.contains("pacman"));
    }

    #[test]
    fn backup_dir_equal_to_cleanup_dir_warns() {
        let mut config = Config::defaults(Path::new("/home/ada"));
        config.backup.dir = config.cleanup_dir.clone();
        let platform = Platform::new(OsKind::MacOs, PackageManager::Brew);
        assert_eq!(config.validate(&platform).len(), 1);
    }
}
