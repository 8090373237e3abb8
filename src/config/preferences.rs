//! Enumerated operator choices and the `[preferences]` settings section.
use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// A closed set of values the operator picks from a numbered list.
pub trait Choice: Copy + Eq + fmt::Debug + 'static {
    /// Every selectable value, in menu order.
    const ALL: &'static [Self];

    /// Settings-file spelling of the value.
    fn as_str(self) -> &'static str;

    /// Menu labels for [`Self::ALL`].
    #[must_use]
    fn labels() -> Vec<String> {
        Self::ALL.iter().map(|c| c.as_str().to_string()).collect()
    }

    /// Value at a menu index, if in range.
    #[must_use]
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Parse `value` against the accepted spellings of `T`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] when `value` matches no variant.
pub fn parse_choice<T: Choice>(field: &str, value: &str) -> Result<T, ConfigError> {
    let wanted = value.trim().to_lowercase();
    T::ALL
        .iter()
        .copied()
        .find(|c| c.as_str().eq_ignore_ascii_case(&wanted))
        .ok_or_else(|| ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: T::ALL
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Colour scheme applied to the terminal emulator and the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dracula,
    Nord,
    Gruvbox,
    Catppuccin,
    TokyoNight,
}

impl Choice for Theme {
    const ALL: &'static [Self] = &[
        Self::Dracula,
        Self::Nord,
        Self::Gruvbox,
        Self::Catppuccin,
        Self::TokyoNight,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Dracula => "dracula",
            Self::Nord => "nord",
            Self::Gruvbox => "gruvbox",
            Self::Catppuccin => "catppuccin",
            Self::TokyoNight => "tokyonight",
        }
    }
}

/// Prompt framework loaded by the generated `.zshrc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    #[default]
    Starship,
    Powerlevel10k,
    Pure,
    None,
}

impl Choice for PromptStyle {
    const ALL: &'static [Self] = &[Self::Starship, Self::Powerlevel10k, Self::Pure, Self::None];

    fn as_str(self) -> &'static str {
        match self {
            Self::Starship => "starship",
            Self::Powerlevel10k => "powerlevel10k",
            Self::Pure => "pure",
            Self::None => "none",
        }
    }
}

/// Supported terminal emulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Alacritty,
    Kitty,
    WezTerm,
    /// macOS only.
    ITerm2,
}

impl Choice for Terminal {
    const ALL: &'static [Self] = &[Self::Alacritty, Self::Kitty, Self::WezTerm, Self::ITerm2];

    fn as_str(self) -> &'static str {
        match self {
            Self::Alacritty => "alacritty",
            Self::Kitty => "kitty",
            Self::WezTerm => "wezterm",
            Self::ITerm2 => "iterm2",
        }
    }
}

impl Terminal {
    /// Terminals offered on the given OS, in menu order.
    #[must_use]
    pub fn available(macos: bool) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|t| macos || *t != Self::ITerm2)
            .collect()
    }

    /// Package name used to install the terminal.
    #[must_use]
    pub const fn package(self) -> &'static str {
        match self {
            Self::Alacritty => "alacritty",
            Self::Kitty => "kitty",
            Self::WezTerm => "wezterm",
            Self::ITerm2 => "iterm2",
        }
    }

    /// Binary looked up on PATH (Linux detection).
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Alacritty => "alacritty",
            Self::Kitty => "kitty",
            Self::WezTerm => "wezterm",
            Self::ITerm2 => "iterm2",
        }
    }

    /// Application bundle name prefix (macOS detection).
    #[must_use]
    pub const fn app_name(self) -> &'static str {
        match self {
            Self::Alacritty => "Alacritty",
            Self::Kitty => "kitty",
            Self::WezTerm => "WezTerm",
            Self::ITerm2 => "iTerm",
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `[preferences]` section as written in the settings file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct RawPreferences {
    terminal: Option<String>,
    theme: Option<String>,
    prompt_style: Option<String>,
    plugins: Option<Vec<String>>,
    show_line_numbers: Option<bool>,
    git_name: Option<String>,
    git_email: Option<String>,
}

/// Canned answers supplied by the settings file.
///
/// Every field is optional; an absent field is asked interactively or
/// takes its default.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Terminal emulator.
    pub terminal: Option<Terminal>,
    /// Colour theme.
    pub theme: Option<Theme>,
    /// Shell prompt.
    pub prompt_style: Option<PromptStyle>,
    /// zinit plugins (`owner/repo`).
    pub plugins: Option<Vec<String>>,
    /// Editor line numbers.
    pub show_line_numbers: Option<bool>,
    /// Git `user.name`.
    pub git_name: Option<String>,
    /// Git `user.email`.
    pub git_email: Option<String>,
}

impl TryFrom<RawPreferences> for Preferences {
    type Error = ConfigError;

    fn try_from(raw: RawPreferences) -> Result<Self, Self::Error> {
        Ok(Self {
            terminal: raw
                .terminal
                .map(|v| parse_choice("preferences.terminal", &v))
                .transpose()?,
            theme: raw
                .theme
                .map(|v| parse_choice("preferences.theme", &v))
                .transpose()?,
            prompt_style: raw
                .prompt_style
                .map(|v| parse_choice("preferences.prompt_style", &v))
                .transpose()?,
            plugins: raw.plugins,
            show_line_numbers: raw.show_line_numbers,
            git_name: raw.git_name.filter(|s| !s.trim().is_empty()),
            git_email: raw.git_email.filter(|s| !s.trim().is_empty()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_choice_is_case_insensitive() {
        let theme: Theme = parse_choice("theme", "Nord").unwrap();
        assert_eq!(theme, Theme::Nord);
        let style: PromptStyle = parse_choice("prompt_style", " PURE ").unwrap();
        assert_eq!(style, PromptStyle::Pure);
    }

    #[test]
    fn parse_choice_rejects_unknown_value() {
        let err = parse_choice::<Theme>("preferences.theme", "neon").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("neon"), "{msg}");
        assert!(msg.contains("dracula, nord, gruvbox, catppuccin, tokyonight"), "{msg}");
    }

    #[test]
    fn iterm2_only_offered_on_macos() {
        assert!(Terminal::available(true).contains(&Terminal::ITerm2));
        assert!(!Terminal::available(false).contains(&Terminal::ITerm2));
        assert_eq!(Terminal::available(false).len(), 3);
    }

    #[test]
    fn from_index_bounds() {
        assert_eq!(Theme::from_index(0), Some(Theme::Dracula));
        assert_eq!(Theme::from_index(Theme::ALL.len()), None);
    }

    #[test]
    fn raw_preferences_convert() {
        let raw: RawPreferences = toml::from_str(
            "terminal = \"kitty\"\ntheme = \"gruvbox\"\nprompt_style = \"none\"\ngit_name = \"\"\n",
        )
        .unwrap();
        let prefs = Preferences::try_from(raw).unwrap();
        assert_eq!(prefs.terminal, Some(Terminal::Kitty));
        assert_eq!(prefs.theme, Some(Theme::Gruvbox));
        assert_eq!(prefs.prompt_style, Some(PromptStyle::None));
        assert_eq!(prefs.git_name, None, "blank strings count as unset");
    }

    #[test]
    fn raw_preferences_reject_bad_terminal() {
        let raw: RawPreferences = toml::from_str("terminal = \"xterm\"\n").unwrap();
        assert!(matches!(
            Preferences::try_from(raw),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "preferences.terminal"
        ));
    }
}
