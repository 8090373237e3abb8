//! Terminal emulator install and theming.
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::packages::ensure_package;
use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::config::Paths;
use crate::config::preferences::Terminal;
use crate::prompt::{choose_value, keys};
use crate::resources::config_file::ConfigFileResource;
use crate::resources::package::PackageRequest;
use crate::templates::render_terminal_config;

/// Whether `terminal` is already installed.
///
/// On macOS this looks for an application bundle whose name starts with the
/// terminal's app name (`/Applications/kitty*.app`); elsewhere the binary
/// must be on PATH.
#[must_use]
pub fn detect_installed(ctx: &Context, terminal: Terminal) -> bool {
    if ctx.platform.is_macos() {
        app_bundle_exists(&ctx.config.paths.applications_dir, terminal.app_name())
    } else {
        ctx.executor.which(terminal.binary())
    }
}

/// Glob for `<dir>/<app_name>*.app`.
fn app_bundle_exists(dir: &Path, app_name: &str) -> bool {
    let pattern = format!(
        "{}/{}*.app",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(app_name)
    );
    glob::glob(&pattern).is_ok_and(|mut paths| paths.any(|p| p.is_ok()))
}

/// Config file written for `terminal`.
#[must_use]
pub fn config_path(paths: &Paths, terminal: Terminal) -> &PathBuf {
    match terminal {
        Terminal::Alacritty => &paths.alacritty_config,
        Terminal::Kitty => &paths.kitty_config,
        Terminal::WezTerm => &paths.wezterm_config,
        Terminal::ITerm2 => &paths.iterm2_theme,
    }
}

/// The terminal for this run: the recorded selection, else the first one
/// already installed, else the operator's pick. The result is recorded.
fn resolve_terminal(ctx: &Context) -> Result<Terminal> {
    if let Some(terminal) = ctx.selections().terminal {
        return Ok(terminal);
    }
    let options = Terminal::available(ctx.platform.is_macos());
    let terminal = match options.iter().copied().find(|t| detect_installed(ctx, *t)) {
        Some(found) => found,
        None => {
            let default = options.first().copied().unwrap_or(Terminal::Alacritty);
            choose_value(
                &*ctx.choices,
                keys::TERMINAL,
                "Terminal emulator",
                &options,
                default,
            )?
        }
    };
    ctx.selections().terminal = Some(terminal);
    Ok(terminal)
}

/// Install the chosen terminal emulator (a cask on macOS).
#[derive(Debug)]
pub struct InstallTerminal;

impl Task for InstallTerminal {
    fn name(&self) -> &'static str {
        "Install terminal emulator"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let terminal = resolve_terminal(ctx)?;
        if detect_installed(ctx, terminal) {
            ctx.log.info(&format!("{terminal} already installed"));
            return Ok(TaskResult::Ok);
        }
        let request = if ctx.platform.is_macos() {
            PackageRequest::cask(terminal.package())
        } else {
            PackageRequest::new(terminal.package())
        };
        Ok(ensure_package(ctx, &request)?.task_result())
    }
}

/// Write the chosen terminal's config with the selected theme and font.
#[derive(Debug)]
pub struct ConfigureTerminalTheme;

impl Task for ConfigureTerminalTheme {
    fn name(&self) -> &'static str {
        "Configure terminal theme"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let terminal = resolve_terminal(ctx)?;
        let options = ctx.selections().theme_options(terminal);
        let resource = ConfigFileResource::new(
            config_path(&ctx.config.paths, terminal).clone(),
            render_terminal_config(&options),
        );
        ctx.log
            .debug(&format!("{} theme for {terminal}", options.theme));
        process_resources(ctx, [resource], &ProcessOpts::apply_all("write"))
    }
}
