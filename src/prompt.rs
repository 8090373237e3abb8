//! Operator choices: numbered menus, free text, and yes/no questions.
//!
//! Tasks never talk to the terminal directly. They ask a [`ChoiceProvider`],
//! which is either satisfied by canned answers ([`AnswerChoices`]) or by an
//! interactive prompt that falls back to those answers first
//! ([`TerminalChoices`]).
use std::collections::HashMap;
use std::fmt;

use anyhow::{Result, bail};
use inquire::InquireError;

use crate::config::preferences::{Choice, Preferences};
use crate::error::BootstrapError;

/// Answer keys shared by the settings file, tests, and tasks.
pub mod keys {
    /// Terminal emulator to install.
    pub const TERMINAL: &str = "terminal";
    /// Colour theme for the terminal and editor.
    pub const THEME: &str = "theme";
    /// Shell prompt flavour.
    pub const PROMPT_STYLE: &str = "prompt_style";
    /// Comma-separated zinit plugins.
    pub const PLUGINS: &str = "plugins";
    /// Whether the editor shows line numbers.
    pub const SHOW_LINE_NUMBERS: &str = "show_line_numbers";
    /// Global git `user.name`.
    pub const GIT_NAME: &str = "git_name";
    /// Global git `user.email`, also the SSH key comment.
    pub const GIT_EMAIL: &str = "git_email";
}

/// Source of operator decisions.
pub trait ChoiceProvider: Send + Sync + fmt::Debug {
    /// Pick one of `options`, returning its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer does not name an option or the prompt
    /// was aborted.
    fn choose(&self, key: &str, prompt: &str, options: &[String], default: usize)
    -> Result<usize>;

    /// Read a line of free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt was aborted.
    fn text(&self, key: &str, prompt: &str, default: &str) -> Result<String>;

    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer is not a boolean or the prompt was
    /// aborted.
    fn confirm(&self, key: &str, prompt: &str, default: bool) -> Result<bool>;
}

/// Canned answers keyed by question; unanswered questions take the default.
#[derive(Debug, Default, Clone)]
pub struct AnswerChoices {
    answers: HashMap<String, String>,
}

impl AnswerChoices {
    /// No answers; every question takes its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an answer.
    #[must_use]
    pub fn with(mut self, key: &str, answer: impl Into<String>) -> Self {
        self.answers.insert(key.to_string(), answer.into());
        self
    }

    /// Answers taken from the settings file's `[preferences]` section.
    #[must_use]
    pub fn from_preferences(prefs: &Preferences) -> Self {
        let mut answers = Self::new();
        if let Some(t) = prefs.terminal {
            answers = answers.with(keys::TERMINAL, t.as_str());
        }
        if let Some(t) = prefs.theme {
            answers = answers.with(keys::THEME, t.as_str());
        }
        if let Some(s) = prefs.prompt_style {
            answers = answers.with(keys::PROMPT_STYLE, s.as_str());
        }
        if let Some(p) = &prefs.plugins {
            answers = answers.with(keys::PLUGINS, p.join(","));
        }
        if let Some(n) = prefs.show_line_numbers {
            answers = answers.with(keys::SHOW_LINE_NUMBERS, n.to_string());
        }
        if let Some(n) = &prefs.git_name {
            answers = answers.with(keys::GIT_NAME, n.clone());
        }
        if let Some(e) = &prefs.git_email {
            answers = answers.with(keys::GIT_EMAIL, e.clone());
        }
        answers
    }

    /// The raw answer for `key`, if one was supplied.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.answers.get(key).map(String::as_str)
    }
}

impl ChoiceProvider for AnswerChoices {
    fn choose(
        &self,
        key: &str,
        _prompt: &str,
        options: &[String],
        default: usize,
    ) -> Result<usize> {
        let Some(answer) = self.get(key) else {
            return Ok(default);
        };
        resolve_option(key, answer, options)
    }

    fn text(&self, key: &str, _prompt: &str, default: &str) -> Result<String> {
        Ok(self.get(key).unwrap_or(default).to_string())
    }

    fn confirm(&self, key: &str, _prompt: &str, default: bool) -> Result<bool> {
        self.get(key).map_or(Ok(default), |a| parse_bool(key, a))
    }
}

/// Interactive prompts for anything the canned answers do not cover.
#[derive(Debug, Default)]
pub struct TerminalChoices {
    answers: AnswerChoices,
}

impl TerminalChoices {
    /// Prompt for anything `answers` leaves open.
    #[must_use]
    pub const fn new(answers: AnswerChoices) -> Self {
        Self { answers }
    }
}

impl ChoiceProvider for TerminalChoices {
    fn choose(&self, key: &str, prompt: &str, options: &[String], default: usize) -> Result<usize> {
        if self.answers.get(key).is_some() {
            return self.answers.choose(key, prompt, options, default);
        }
        let numbered: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(i, o)| format!("{}) {o}", i + 1))
            .collect();
        let picked = inquire::Select::new(prompt, numbered)
            .with_starting_cursor(default.min(options.len().saturating_sub(1)))
            .raw_prompt()
            .map_err(prompt_error)?;
        Ok(picked.index)
    }

    fn text(&self, key: &str, prompt: &str, default: &str) -> Result<String> {
        if let Some(answer) = self.answers.get(key) {
            return Ok(answer.to_string());
        }
        inquire::Text::new(prompt)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }

    fn confirm(&self, key: &str, prompt: &str, default: bool) -> Result<bool> {
        if self.answers.get(key).is_some() {
            return self.answers.confirm(key, prompt, default);
        }
        inquire::Confirm::new(prompt)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }
}

/// Ctrl-C and Esc abort the whole run; other prompt failures stay local to
/// the asking task.
fn prompt_error(err: InquireError) -> anyhow::Error {
    match err {
        InquireError::OperationInterrupted | InquireError::OperationCanceled => {
            BootstrapError::Interrupted.into()
        }
        other => anyhow::Error::new(other).context("prompt failed"),
    }
}

/// Ask for one value of an enumerated [`Choice`].
///
/// # Errors
///
/// Propagates provider errors.
pub fn choose_value<T: Choice>(
    provider: &dyn ChoiceProvider,
    key: &str,
    prompt: &str,
    options: &[T],
    default: T,
) -> Result<T> {
    let labels: Vec<String> = options.iter().map(|o| o.as_str().to_string()).collect();
    let default_index = options.iter().position(|o| *o == default).unwrap_or(0);
    let index = provider.choose(key, prompt, &labels, default_index)?;
    options
        .get(index)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("choice {index} out of range for {key}"))
}

/// Match an answer against option labels, or a 1-based menu number.
fn resolve_option(key: &str, answer: &str, options: &[String]) -> Result<usize> {
    let answer = answer.trim();
    if let Some(i) = options.iter().position(|o| o.eq_ignore_ascii_case(answer)) {
        return Ok(i);
    }
    if let Ok(n) = answer.parse::<usize>()
        && (1..=options.len()).contains(&n)
    {
        return Ok(n - 1);
    }
    bail!(
        "answer '{answer}' for {key} is not one of: {}",
        options.join(", ")
    )
}

fn parse_bool(key: &str, answer: &str) -> Result<bool> {
    match answer.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        other => bail!("answer '{other}' for {key} is not yes or no"),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::preferences::{PromptStyle, Terminal, Theme};

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn unanswered_questions_take_defaults() {
        let answers = AnswerChoices::new();
        assert_eq!(
            answers.choose("theme", "Theme", &labels(&["a", "b"]), 1).unwrap(),
            1
        );
        assert_eq!(answers.text("git_name", "Name", "anon").unwrap(), "anon");
        assert!(answers.confirm("x", "?", true).unwrap());
    }

    #[test]
    fn choose_by_label_or_number() {
        let answers = AnswerChoices::new().with("a", "NORD").with("b", "3");
        let opts = labels(&["dracula", "nord", "gruvbox"]);
        assert_eq!(answers.choose("a", "", &opts, 0).unwrap(), 1);
        assert_eq!(answers.choose("b", "", &opts, 0).unwrap(), 2);
    }

    #[test]
    fn choose_rejects_out_of_range_number() {
        let answers = AnswerChoices::new().with("a", "4");
        let err = answers
            .choose("a", "", &labels(&["x", "y", "z"]), 0)
            .unwrap_err();
        assert!(err.to_string().contains("not one of"));
    }

    #[test]
    fn confirm_parses_common_spellings() {
        let answers = AnswerChoices::new().with("a", "yes").with("b", "0").with("c", "maybe");
        assert!(answers.confirm("a", "", false).unwrap());
        assert!(!answers.confirm("b", "", true).unwrap());
        assert!(answers.confirm("c", "", true).is_err());
    }

    #[test]
    fn preferences_become_answers() {
        let prefs = Preferences {
            terminal: Some(Terminal::Kitty),
            theme: Some(Theme::Catppuccin),
            prompt_style: Some(PromptStyle::Pure),
            plugins: Some(vec!["a/b".into(), "c/d".into()]),
            show_line_numbers: Some(false),
            git_name: Some("Ada".into()),
            git_email: None,
        };
        let answers = AnswerChoices::from_preferences(&prefs);
        assert_eq!(answers.get(keys::TERMINAL), Some("kitty"));
        assert_eq!(answers.get(keys::THEME), Some("catppuccin"));
        assert_eq!(answers.get(keys::PROMPT_STYLE), Some("pure"));
        assert_eq!(answers.get(keys::PLUGINS), Some("a/b,c/d"));
        assert_eq!(answers.get(keys::SHOW_LINE_NUMBERS), Some("false"));
        assert_eq!(answers.get(keys::GIT_NAME), Some("Ada"));
        assert_eq!(answers.get(keys::GIT_EMAIL), None);
    }

    #[test]
    fn choose_value_maps_back_to_enum() {
        let answers = AnswerChoices::new().with(keys::THEME, "gruvbox");
        let theme = choose_value(&answers, keys::THEME, "Theme", Theme::ALL, Theme::Dracula)
            .unwrap();
        assert_eq!(theme, Theme::Gruvbox);
    }

    #[test]
    fn aborted_prompts_interrupt_the_run() {
        for err in [
            InquireError::OperationInterrupted,
            InquireError::OperationCanceled,
        ] {
            assert!(crate::error::is_fatal(&prompt_error(err)));
        }
        let not_a_tty = prompt_error(InquireError::NotTTY);
        assert!(!crate::error::is_fatal(&not_a_tty));
        assert!(format!("{not_a_tty:#}").starts_with("prompt failed"));
    }

    #[test]
    fn terminal_choices_prefer_canned_answers() {
        let provider = TerminalChoices::new(AnswerChoices::new().with("k", "2").with("t", "x"));
        assert_eq!(
            provider.choose("k", "", &labels(&["a", "b"]), 0).unwrap(),
            1
        );
        assert_eq!(provider.text("t", "", "d").unwrap(), "x");
    }
}
