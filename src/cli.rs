//! Command-line interface definitions.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the workstation bootstrap engine.
/// Parsed command line.
#[derive(Parser, Debug)]
#[command(
    name = "bootstrap",
    about = "Idempotent macOS/Linux workstation bootstrap",
    version
)]
pub struct Cli {
    /// Subcommand to run; defaults to `install`
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The requested subcommand, `install` when none was given.
    #[must_use]
    pub fn subcommand(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Install(InstallOpts::default()))
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying (also enabled by DRY_RUN=1)
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Settings file (defaults to $XDG_CONFIG_HOME/bootstrap/bootstrap.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never prompt; unanswered questions take their defaults
    #[arg(long, global = true)]
    pub non_interactive: bool,
}

impl GlobalOpts {
    /// Dry-run from the flag or the `DRY_RUN` environment variable.
    #[must_use]
    pub fn dry_run_requested(&self) -> bool {
        self.dry_run || env_flag(std::env::var("DRY_RUN").ok().as_deref())
    }
}

/// Whether an environment value switches a flag on (`1`, `true`, `yes`).
///
/// # Examples
///
/// ```
/// use bootstrap_cli::cli::env_flag;
///
/// assert!(env_flag(Some("YES")));
/// assert!(!env_flag(Some("0")));
/// assert!(!env_flag(None));
/// ```
#[must_use]
pub fn env_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        ["1", "true", "yes"]
            .iter()
            .any(|accepted| v.eq_ignore_ascii_case(accepted))
    })
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Provision this machine (the default)
    Install(InstallOpts),
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Skip tasks whose name contains any of these
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only tasks whose name contains any of these
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}
