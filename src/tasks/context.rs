use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::preferences::{PromptStyle, Terminal, Theme};
use crate::config::{Config, DEFAULT_PLUGINS};
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::prompt::ChoiceProvider;
use crate::resources::package::{PackageBackend, backend_for};
use crate::templates::{EditorOptions, ShellOptions, ThemeOptions};

/// Decisions made while the run is in progress.
///
/// Filled in by the preferences task; later tasks read it. When that task is
/// filtered out, the defaults below apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selections {
    /// Terminal emulator to install and theme; `None` means detect.
    pub terminal: Option<Terminal>,
    /// Theme for the terminal and editor.
    pub theme: Theme,
    /// Prompt written into `.zshrc`.
    pub prompt_style: PromptStyle,
    /// zinit plugins.
    pub plugins: Vec<String>,
    /// Editor line numbers.
    pub show_line_numbers: bool,
    /// Git `user.name`, if provided.
    pub git_name: Option<String>,
    /// Git `user.email`, if provided.
    pub git_email: Option<String>,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            terminal: None,
            theme: Theme::default(),
            prompt_style: PromptStyle::default(),
            plugins: DEFAULT_PLUGINS.iter().map(ToString::to_string).collect(),
            show_line_numbers: true,
            git_name: None,
            git_email: None,
        }
    }
}

impl Selections {
    /// Inputs for the rc renderer.
    #[must_use]
    pub fn shell_options(&self) -> ShellOptions {
        ShellOptions {
            prompt_style: self.prompt_style,
            plugins: self.plugins.clone(),
        }
    }

    /// Inputs for the editor renderer.
    #[must_use]
    pub const fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            theme: self.theme,
            show_line_numbers: self.show_line_numbers,
        }
    }

    /// Inputs for the terminal renderer.
    #[must_use]
    pub const fn theme_options(&self, terminal: Terminal) -> ThemeOptions {
        ThemeOptions::new(terminal, self.theme)
    }
}

/// Shared context for task execution.
pub struct Context {
    /// Settings resolved at startup.
    pub config: Arc<Config>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// The one package backend every request is routed to.
    pub backend: Arc<dyn PackageBackend>,
    /// Source of operator decisions.
    pub choices: Arc<dyn ChoiceProvider>,
    /// Decisions recorded so far in this run.
    pub selections: Arc<Mutex<Selections>>,
    /// Current login shell path (`$SHELL`), possibly empty.
    pub login_shell: String,
    /// Running under CI, where the login shell is left alone.
    pub ci: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &"<dyn Executor>")
            .field("backend", &self.backend.manager())
            .field("choices", &self.choices)
            .field("login_shell", &self.login_shell)
            .field("ci", &self.ci)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a new context for task execution.
    ///
    /// The package backend is chosen here from the platform and never changes
    /// afterwards. `$SHELL` and `$CI` are read once.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        choices: Arc<dyn ChoiceProvider>,
    ) -> Self {
        let backend = backend_for(platform.manager, Arc::clone(&executor));
        Self {
            config,
            platform,
            log,
            dry_run,
            executor,
            backend,
            choices,
            selections: Arc::new(Mutex::new(Selections::default())),
            login_shell: std::env::var("SHELL").unwrap_or_default(),
            ci: std::env::var_os("CI").is_some(),
        }
    }

    /// Lock the run's selections.
    ///
    /// Recovers from a poisoned lock (which can only occur if a previous task
    /// panicked) by consuming the poison and returning the inner value.
    pub fn selections(&self) -> MutexGuard<'_, Selections> {
        self.selections
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Create a copy of this context with a different logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            platform: Arc::clone(&self.platform),
            log,
            dry_run: self.dry_run,
            executor: Arc::clone(&self.executor),
            backend: Arc::clone(&self.backend),
            choices: Arc::clone(&self.choices),
            selections: Arc::clone(&self.selections),
            login_shell: self.login_shell.clone(),
            ci: self.ci,
        }
    }
}
