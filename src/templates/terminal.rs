use std::fmt::Write as _;

use super::ThemeOptions;
use crate::config::preferences::{Terminal, Theme};

/// Terminal colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Background as `#rrggbb`.
    pub background: &'static str,
    /// Default text colour as `#rrggbb`.
    pub foreground: &'static str,
    /// ANSI black, red, green, yellow, blue, magenta, cyan, white.
    pub normal: [&'static str; 8],
}

impl Palette {
    /// Palette for `theme`.
    #[must_use]
    pub const fn of(theme: Theme) -> Self {
        match theme {
            Theme::Dracula => Self {
                background: "#282a36",
                foreground: "#f8f8f2",
                normal: [
                    "#21222c", "#ff5555", "#50fa7b", "#f1fa8c", "#bd93f9", "#ff79c6", "#8be9fd",
                    "#f8f8f2",
                ],
            },
            Theme::Nord => Self {
                background: "#2e3440",
                foreground: "#d8dee9",
                normal: [
                    "#3b4252", "#bf616a", "#a3be8c", "#ebcb8b", "#81a1c1", "#b48ead", "#88c0d0",
                    "#e5e9f0",
                ],
            },
            Theme::Gruvbox => Self {
                background: "#282828",
                foreground: "#ebdbb2",
                normal: [
                    "#282828", "#cc241d", "#98971a", "#d79921", "#458588", "#b16286", "#689d6a",
                    "#a89984",
                ],
            },
            Theme::Catppuccin => Self {
                background: "#1e1e2e",
                foreground: "#cdd6f4",
                normal: [
                    "#45475a", "#f38ba8", "#a6e3a1", "#f9e2af", "#89b4fa", "#f5c2e7", "#94e2d5",
                    "#bac2de",
                ],
            },
            Theme::TokyoNight => Self {
                background: "#1a1b26",
                foreground: "#c0caf5",
                normal: [
                    "#15161e", "#f7768e", "#9ece6a", "#e0af68", "#7aa2f7", "#bb9af7", "#7dcfff",
                    "#a9b1d6",
                ],
            },
        }
    }
}

const ANSI_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// Render the config file for [`ThemeOptions::terminal`].
#[must_use]
pub fn render_terminal_config(opts: &ThemeOptions) -> String {
    let palette = Palette::of(opts.theme);
    match opts.terminal {
        Terminal::Alacritty => alacritty(opts, &palette),
        Terminal::Kitty => kitty(opts, &palette),
        Terminal::WezTerm => wezterm(opts, &palette),
        Terminal::ITerm2 => iterm2(opts, &palette),
    }
}

fn alacritty(opts: &ThemeOptions, p: &Palette) -> String {
    let mut out = format!("# Generated by bootstrap (theme: {}).\n\n", opts.theme);
    let _ = writeln!(out, "[font]\nsize = {:.1}\n", opts.font_size);
    let _ = writeln!(out, "[font.normal]\nfamily = \"{}\"\n", opts.font_family);
    let _ = writeln!(
        out,
        "[colors.primary]\nbackground = \"{}\"\nforeground = \"{}\"\n",
        p.background, p.foreground
    );
    out.push_str("[colors.normal]\n");
    for (name, colour) in ANSI_NAMES.iter().zip(p.normal) {
        let _ = writeln!(out, "{name} = \"{colour}\"");
    }
    out
}

fn kitty(opts: &ThemeOptions, p: &Palette) -> String {
    let mut out = format!("# Generated by bootstrap (theme: {}).\n\n", opts.theme);
    let _ = writeln!(out, "font_family {}", opts.font_family);
    let _ = writeln!(out, "font_size {:.1}\n", opts.font_size);
    let _ = writeln!(out, "background {}", p.background);
    let _ = writeln!(out, "foreground {}", p.foreground);
    for (i, colour) in p.normal.iter().enumerate() {
        let _ = writeln!(out, "color{i} {colour}");
    }
    out
}

fn wezterm(opts: &ThemeOptions, p: &Palette) -> String {
    let mut out = format!("-- Generated by bootstrap (theme: {}).\n", opts.theme);
    out.push_str("local wezterm = require(\"wezterm\")\nlocal config = wezterm.config_builder()\n\n");
    let _ = writeln!(out, "config.font = wezterm.font(\"{}\")", opts.font_family);
    let _ = writeln!(out, "config.font_size = {:.1}", opts.font_size);
    out.push_str("config.colors = {\n");
    let _ = writeln!(out, "  background = \"{}\",", p.background);
    let _ = writeln!(out, "  foreground = \"{}\",", p.foreground);
    let ansi = p
        .normal
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "  ansi = {{ {ansi} }},");
    out.push_str("}\n\nreturn config\n");
    out
}

fn iterm2(opts: &ThemeOptions, p: &Palette) -> String {
    let mut out = format!("iTerm2 theme: {}\n", opts.theme);
    let _ = writeln!(out, "Font: {} {:.1}", opts.font_family, opts.font_size);
    out.push_str(
        "Apply these colours under Settings > Profiles > Colors, or import the \
         matching preset from https://iterm2colorschemes.com/.\n\n",
    );
    let _ = writeln!(out, "background {}", p.background);
    let _ = writeln!(out, "foreground {}", p.foreground);
    for (name, colour) in ANSI_NAMES.iter().zip(p.normal) {
        let _ = writeln!(out, "{name} {colour}");
    }
    out
}
