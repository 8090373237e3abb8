//! Pure renderers for the generated configuration artifacts.
//!
//! Each renderer takes a typed options struct and returns the full file
//! content. Output depends only on the options: no timestamps, no host
//! lookups, so equal inputs always render byte-identical text.
mod nvim;
mod terminal;
mod zshrc;

pub use nvim::render_nvim_init;
pub use terminal::{Palette, render_terminal_config};
pub use zshrc::render_zshrc;

use crate::config::preferences::{PromptStyle, Terminal, Theme};

/// Font family written into every terminal config.
pub const NERD_FONT_FAMILY: &str = "JetBrainsMono Nerd Font";

/// Font size written into every terminal config.
pub const FONT_SIZE: f32 = 14.0;

/// Inputs for the shell rc file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOptions {
    /// Prompt initialised at the end of the rc file.
    pub prompt_style: PromptStyle,
    /// zinit plugin identifiers (`owner/repo`).
    pub plugins: Vec<String>,
}

/// Inputs for the editor init file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Colour scheme loaded at startup.
    pub theme: Theme,
    /// Enables `number` and `relativenumber`.
    pub show_line_numbers: bool,
}

/// Inputs for the terminal emulator config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeOptions {
    /// Selects the config syntax.
    pub terminal: Terminal,
    /// Source of the colour palette.
    pub theme: Theme,
    /// Font family name as the terminal expects it.
    pub font_family: &'static str,
    /// Point size.
    pub font_size: f32,
}

impl ThemeOptions {
    /// Options with the default Nerd Font.
    #[must_use]
    pub const fn new(terminal: Terminal, theme: Theme) -> Self {
        Self {
            terminal,
            theme,
            font_family: NERD_FONT_FAMILY,
            font_size: FONT_SIZE,
        }
    }
}
