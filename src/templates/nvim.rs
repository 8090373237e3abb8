use std::fmt::Write as _;

use super::EditorOptions;
use crate::config::preferences::Theme;

/// Colorscheme plugin and name for each theme.
const fn colorscheme(theme: Theme) -> (&'static str, &'static str) {
    match theme {
        Theme::Dracula => ("Mofiqul/dracula.nvim", "dracula"),
        Theme::Nord => ("shaunsingh/nord.nvim", "nord"),
        Theme::Gruvbox => ("ellisonleao/gruvbox.nvim", "gruvbox"),
        Theme::Catppuccin => ("catppuccin/nvim", "catppuccin"),
        Theme::TokyoNight => ("folke/tokyonight.nvim", "tokyonight"),
    }
}

/// Render `~/.config/nvim/init.lua`.
#[must_use]
pub fn render_nvim_init(opts: &EditorOptions) -> String {
    let (plugin, scheme) = colorscheme(opts.theme);
    let numbers = if opts.show_line_numbers {
        "true"
    } else {
        "false"
    };

    let mut out = String::from(
        "-- Generated by bootstrap. Local changes are overwritten on the next run.\n\
         vim.g.mapleader = \" \"\n\n\
         local opt = vim.opt\n",
    );
    let _ = writeln!(out, "opt.number = {numbers}");
    let _ = writeln!(out, "opt.relativenumber = {numbers}");
    out.push_str(
        "opt.expandtab = true\n\
         opt.shiftwidth = 4\n\
         opt.tabstop = 4\n\
         opt.smartindent = true\n\
         opt.ignorecase = true\n\
         opt.smartcase = true\n\
         opt.undofile = true\n\
         opt.termguicolors = true\n\
         opt.clipboard = \"unnamedplus\"\n\n\
         local lazypath = vim.fn.stdpath(\"data\") .. \"/lazy/lazy.nvim\"\n\
         if not (vim.uv or vim.loop).fs_stat(lazypath) then\n  \
           vim.fn.system({ \"git\", \"clone\", \"--filter=blob:none\", \"--branch=stable\",\n    \
             \"https://github.com/folke/lazy.nvim.git\", lazypath })\n\
         end\n\
         opt.rtp:prepend(lazypath)\n\n",
    );
    let _ = writeln!(out, "require(\"lazy\").setup({{");
    let _ = writeln!(out, "  {{");
    let _ = writeln!(out, "    \"{plugin}\",");
    let _ = writeln!(out, "    priority = 1000,");
    let _ = writeln!(
        out,
        "    config = function() vim.cmd.colorscheme(\"{scheme}\") end,"
    );
    let _ = writeln!(out, "  }},");
    let _ = writeln!(out, "}})");
    out
}
