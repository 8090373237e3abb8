//! Subcommand entry points and the setup they share.
pub mod install;
pub mod version;

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::exec::Executor;
use crate::logging::{Log, Logger};
use crate::platform::{PackageManager, Platform};
use crate::prompt::{AnswerChoices, ChoiceProvider, TerminalChoices};
use crate::tasks::{self, Context, Task};

/// The operator's home directory from `$HOME`.
///
/// # Errors
///
/// Returns an error if `HOME` is unset or empty.
pub fn resolve_home() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .context("HOME is not set")
}

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates platform detection and settings loading so that each command
/// does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Platform detected at startup.
    pub platform: Platform,
    /// Settings loaded for this host.
    pub config: Config,
}

impl CommandSetup {
    /// Detect the platform and load the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform is unsupported or the settings file
    /// cannot be read or parsed.
    pub fn init(
        global: &GlobalOpts,
        home: &Path,
        executor: &dyn Executor,
        log: &Logger,
    ) -> Result<Self> {
        log.stage("Detecting platform");
        let platform = Platform::detect(|| executor.which(PackageManager::Yay.binary()))?;
        log.info(&format!("platform: {platform}"));

        log.stage("Loading configuration");
        let config = Config::load(global.config.as_deref(), home)?;
        log.debug(&format!("settings: {}", config.settings_file.display()));
        log.info(&format!(
            "loaded {} packages, {} casks",
            config.packages.len(),
            config.casks.len()
        ));

        let warnings = config.validate(&platform);
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self { platform, config })
    }

    /// Build the task context.
    ///
    /// Prompts are only shown when stdin is a terminal and neither dry-run
    /// nor `--non-interactive` is in effect; otherwise the settings file's
    /// answers and the defaults are used.
    #[must_use]
    pub fn into_context(
        self,
        global: &GlobalOpts,
        executor: Arc<dyn Executor>,
        log: Arc<dyn Log>,
    ) -> Context {
        let dry_run = global.dry_run_requested();
        let answers = AnswerChoices::from_preferences(&self.config.preferences);
        let interactive = !global.non_interactive && !dry_run && std::io::stdin().is_terminal();
        let choices: Arc<dyn ChoiceProvider> = if interactive {
            Arc::new(TerminalChoices::new(answers))
        } else {
            Arc::new(answers)
        };
        Context::new(
            Arc::new(self.config),
            Arc::new(self.platform),
            log,
            dry_run,
            executor,
            choices,
        )
    }
}

/// Execute tasks in order, stopping at the first fatal failure.
///
/// # Errors
///
/// Returns the fatal task error, if any.
pub fn run_tasks<'a>(tasks: impl IntoIterator<Item = &'a dyn Task>, ctx: &Context) -> Result<()> {
    tasks
        .into_iter()
        .try_for_each(|task| tasks::execute(task, ctx))
}

/// Execute every task in order and print the summary.
///
/// Non-fatal failures are reported in the summary only.
///
/// # Errors
///
/// Returns an error if a task failed fatally.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    let outcome = run_tasks(tasks, ctx);
    log.print_summary();
    if outcome.is_ok() && log.has_failures() {
        log.warn(&format!(
            "{} task(s) did not complete; see the log for details",
            log.failure_count()
        ));
    }
    outcome
}
