//! Up-front questions whose answers drive the later feature tasks.
use anyhow::Result;

use super::{Context, Selections, Task, TaskResult};
use crate::config::preferences::{Choice as _, PromptStyle, Terminal, Theme};
use crate::prompt::{choose_value, keys};

use super::terminal::detect_installed;

/// Ask for terminal, theme, prompt style, plugins, and git identity.
///
/// Collecting answers never changes the host, so this task behaves the same
/// in dry-run.
#[derive(Debug)]
pub struct CollectPreferences;

impl Task for CollectPreferences {
    fn name(&self) -> &'static str {
        "Collect preferences"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let choices = &*ctx.choices;
        let defaults = Selections::default();

        let terminals = Terminal::available(ctx.platform.is_macos());
        let default_terminal = terminals
            .iter()
            .copied()
            .find(|t| detect_installed(ctx, *t))
            .or_else(|| terminals.first().copied())
            .unwrap_or(Terminal::Alacritty);
        let terminal = choose_value(
            choices,
            keys::TERMINAL,
            "Terminal emulator",
            &terminals,
            default_terminal,
        )?;

        let theme = choose_value(choices, keys::THEME, "Colour theme", Theme::ALL, defaults.theme)?;
        let prompt_style = choose_value(
            choices,
            keys::PROMPT_STYLE,
            "Shell prompt",
            PromptStyle::ALL,
            defaults.prompt_style,
        )?;
        let plugins = parse_plugins(&choices.text(
            keys::PLUGINS,
            "zinit plugins (comma separated)",
            &defaults.plugins.join(","),
        )?);
        let show_line_numbers = choices.confirm(
            keys::SHOW_LINE_NUMBERS,
            "Show line numbers in the editor?",
            defaults.show_line_numbers,
        )?;

        let git_name = non_empty(choices.text(
            keys::GIT_NAME,
            "Git user name",
            &current_git_value(ctx, "user.name"),
        )?);
        let git_email = non_empty(choices.text(
            keys::GIT_EMAIL,
            "Git email",
            &current_git_value(ctx, "user.email"),
        )?);

        let selections = Selections {
            terminal: Some(terminal),
            theme,
            prompt_style,
            plugins,
            show_line_numbers,
            git_name,
            git_email,
        };
        ctx.log.info(&format!(
            "terminal: {terminal}, theme: {theme}, prompt: {prompt_style}, {} plugins",
            selections.plugins.len()
        ));
        *ctx.selections() = selections;
        Ok(TaskResult::Ok)
    }
}

/// Split a comma separated plugin list, dropping blanks.
fn parse_plugins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Existing global git value, used as the prompt default.
fn current_git_value(ctx: &Context, key: &str) -> String {
    ctx.executor
        .run_unchecked("git", &["config", "--global", "--get", key])
        .ok()
        .filter(|r| r.success)
        .map(|r| r.stdout.trim().to_string())
        .unwrap_or_default()
}
