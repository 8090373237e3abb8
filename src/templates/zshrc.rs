use std::fmt::Write as _;

use super::ShellOptions;
use crate::config::preferences::PromptStyle;

const HEADER: &str = "\
# Generated by bootstrap. Local changes are overwritten on the next run;
# the previous version is kept in ~/.zshrc.bak.
";

const ZINIT_BLOCK: &str = r#"
ZINIT_HOME="${XDG_DATA_HOME:-$HOME/.local/share}/zinit/zinit.git"
if [[ ! -d "$ZINIT_HOME" ]]; then
  mkdir -p "$(dirname "$ZINIT_HOME")"
  git clone https://github.com/zdharma-continuum/zinit.git "$ZINIT_HOME"
fi
source "$ZINIT_HOME/zinit.zsh"

HISTFILE="$HOME/.zsh_history"
HISTSIZE=10000
SAVEHIST=10000
setopt share_history hist_ignore_all_dups
"#;

/// Render `~/.zshrc`.
///
/// The prompt block is chosen by [`ShellOptions::prompt_style`]; the plugin
/// list is emitted in the given order.
#[must_use]
pub fn render_zshrc(opts: &ShellOptions) -> String {
    let mut out = String::from(HEADER);
    out.push_str(ZINIT_BLOCK);

    if !opts.plugins.is_empty() {
        out.push_str("\n# Plugins\n");
        for plugin in &opts.plugins {
            let _ = writeln!(out, "zinit light {plugin}");
        }
    }

    out.push_str("\nautoload -Uz compinit && compinit\n");

    let _ = writeln!(out, "\n# Prompt: {}", opts.prompt_style);
    out.push_str(prompt_block(opts.prompt_style));
    out
}

const fn prompt_block(style: PromptStyle) -> &'static str {
    match style {
        PromptStyle::Starship => "eval \"$(starship init zsh)\"\n",
        PromptStyle::Powerlevel10k => {
            "zinit ice depth=1\nzinit light romkatv/powerlevel10k\n[[ -f ~/.p10k.zsh ]] && source ~/.p10k.zsh\n"
        }
        PromptStyle::Pure => {
            "zinit ice compile'(pure|async).zsh' pick'async.zsh' src'pure.zsh'\nzinit light sindresorhus/pure\n"
        }
        PromptStyle::None => "PROMPT='%n@%m %1~ %# '\n",
    }
}
