//! Settings file loading and resolved artifact paths.
pub mod preferences;
pub mod toml_loader;
pub mod validation;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::logging::default_log_dir;
use preferences::{Preferences, RawPreferences};

/// Packages installed when the settings file does not override the list.
pub const DEFAULT_PACKAGES: &[&str] = &[
    "git", "curl", "wget", "tmux", "ripgrep", "fzf", "jq", "tree",
];

/// Plugins loaded through zinit when none are configured.
pub const DEFAULT_PLUGINS: &[&str] = &[
    "zsh-users/zsh-autosuggestions",
    "zsh-users/zsh-syntax-highlighting",
    "zsh-users/zsh-completions",
];

/// Settings file name inside the config directory.
const SETTINGS_FILE: &str = "bootstrap.toml";

/// Raw settings document.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Settings {
    packages: Option<Vec<String>>,
    casks: Vec<String>,
    preferences: RawPreferences,
    backup: BackupSection,
    cleanup: CleanupSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BackupSection {
    dir: Option<String>,
    remote: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CleanupSection {
    dir: Option<String>,
}

/// Backup staging directory and its remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupConfig {
    /// Local git working tree mirrored to the remote.
    pub dir: PathBuf,
    /// URL registered as `origin`; push is skipped when unset.
    pub remote: Option<String>,
}

/// Every filesystem location the run reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// `~/.zshrc`.
    pub zshrc: PathBuf,
    /// Single backup of the previous rc file.
    pub zshrc_backup: PathBuf,
    /// zinit checkout.
    pub zinit_dir: PathBuf,
    /// Neovim `init.lua`.
    pub nvim_init: PathBuf,
    /// Alacritty config file.
    pub alacritty_config: PathBuf,
    /// Kitty config file.
    pub kitty_config: PathBuf,
    /// `WezTerm` config file.
    pub wezterm_config: PathBuf,
    /// iTerm2 colour notes, since iTerm2 keeps its settings in a plist.
    pub iterm2_theme: PathBuf,
    /// Private ed25519 key; the public key sits next to it.
    pub ssh_key: PathBuf,
    /// Directories searched for an installed Nerd Font.
    pub font_dirs: Vec<PathBuf>,
    /// Where macOS application bundles live.
    pub applications_dir: PathBuf,
    /// Log file and installed-package listing directory.
    pub log_dir: PathBuf,
}

impl Paths {
    /// Resolve the fixed artifact layout under `home`.
    #[must_use]
    pub fn new(home: &Path) -> Self {
        let config = home.join(".config");
        Self {
            zshrc: home.join(".zshrc"),
            zshrc_backup: home.join(".zshrc.bak"),
            zinit_dir: home.join(".local/share/zinit/zinit.git"),
            nvim_init: config.join("nvim").join("init.lua"),
            alacritty_config: config.join("alacritty").join("alacritty.toml"),
            kitty_config: config.join("kitty").join("kitty.conf"),
            wezterm_config: config.join("wezterm").join("wezterm.lua"),
            iterm2_theme: config.join("bootstrap").join("iterm2-theme.txt"),
            ssh_key: home.join(".ssh").join("id_ed25519"),
            font_dirs: vec![
                home.join("Library/Fonts"),
                home.join(".local/share/fonts"),
                home.join(".fonts"),
                PathBuf::from("/Library/Fonts"),
                PathBuf::from("/usr/share/fonts"),
                PathBuf::from("/usr/local/share/fonts"),
            ],
            applications_dir: PathBuf::from("/Applications"),
            log_dir: default_log_dir(home),
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings file driving the run (may not exist).
    pub settings_file: PathBuf,
    /// Base package list.
    pub packages: Vec<String>,
    /// Homebrew casks (ignored on other backends).
    pub casks: Vec<String>,
    /// Canned answers for the choice provider.
    pub preferences: Preferences,
    /// Backup staging directory and remote.
    pub backup: BackupConfig,
    /// Directory swept for stale files.
    pub cleanup_dir: PathBuf,
    /// Resolved artifact locations.
    pub paths: Paths,
}

impl Config {
    /// Load the settings file and resolve every path against `home`.
    ///
    /// With `path == None` the default location is used and a missing file
    /// means all defaults. An explicitly given path must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if a
    /// preference holds an unknown value.
    pub fn load(path: Option<&Path>, home: &Path) -> Result<Self, ConfigError> {
        let settings_file = path.map_or_else(|| default_settings_path(home), Path::to_path_buf);
        if path.is_some() && !settings_file.is_file() {
            return Err(ConfigError::Io {
                path: settings_file.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }

        let settings: Settings = toml_loader::load_config(&settings_file)?;
        Self::from_settings(settings_file, settings, home)
    }

    /// Defaults only, as if no settings file existed.
    #[must_use]
    pub fn defaults(home: &Path) -> Self {
        Self {
            settings_file: default_settings_path(home),
            packages: DEFAULT_PACKAGES.iter().map(ToString::to_string).collect(),
            casks: Vec::new(),
            preferences: Preferences::default(),
            backup: BackupConfig {
                dir: home.join("dotfiles-backup"),
                remote: None,
            },
            cleanup_dir: home.join("Downloads"),
            paths: Paths::new(home),
        }
    }

    fn from_settings(
        settings_file: PathBuf,
        settings: Settings,
        home: &Path,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::defaults(home);
        Ok(Self {
            settings_file,
            packages: settings.packages.unwrap_or(defaults.packages),
            casks: settings.casks,
            preferences: Preferences::try_from(settings.preferences)?,
            backup: BackupConfig {
                dir: settings
                    .backup
                    .dir
                    .map_or(defaults.backup.dir, |d| expand_tilde(&d, home)),
                remote: settings.backup.remote.filter(|r| !r.trim().is_empty()),
            },
            cleanup_dir: settings
                .cleanup
                .dir
                .map_or(defaults.cleanup_dir, |d| expand_tilde(&d, home)),
            paths: defaults.paths,
        })
    }
}

/// Default settings file: `$XDG_CONFIG_HOME/bootstrap/bootstrap.toml`
/// (or `~/.config/bootstrap/bootstrap.toml`).
#[must_use]
pub fn default_settings_path(home: &Path) -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map_or_else(|| home.join(".config"), PathBuf::from)
        .join("bootstrap")
        .join(SETTINGS_FILE)
}

/// Expand a leading `~` or `~/` to `home`.
#[must_use]
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
