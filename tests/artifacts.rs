#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the generated artifacts and the resources that
//! manage them: rendered config files, the backup staging repository, and
//! stale file cleanup.

mod common;

use std::time::SystemTime;

use bootstrap_cli::config::preferences::{Choice as _, PromptStyle, Terminal, Theme};
use bootstrap_cli::resources::config_file::ConfigFileResource;
use bootstrap_cli::resources::repository::{CommitOutcome, StagingRepository};
use bootstrap_cli::resources::stale_file::{MAX_AGE_DAYS, stale_files};
use bootstrap_cli::resources::{Applicable as _, Resource as _, ResourceState};
use bootstrap_cli::templates::{
    EditorOptions, NERD_FONT_FAMILY, ShellOptions, ThemeOptions, render_nvim_init,
    render_terminal_config, render_zshrc,
};

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[test]
fn every_terminal_and_theme_renders_the_nerd_font() {
    for &terminal in Terminal::ALL {
        for &theme in Theme::ALL {
            let config = render_terminal_config(&ThemeOptions::new(terminal, theme));
            assert!(!config.is_empty());
            if terminal != Terminal::ITerm2 {
                assert!(
                    config.contains(NERD_FONT_FAMILY),
                    "{terminal:?}/{theme:?} lacks the font"
                );
            }
        }
    }
}

#[test]
fn rendering_is_deterministic() {
    let shell = ShellOptions {
        prompt_style: PromptStyle::Powerlevel10k,
        plugins: vec!["zsh-users/zsh-autosuggestions".to_string()],
    };
    assert_eq!(render_zshrc(&shell), render_zshrc(&shell.clone()));

    let editor = EditorOptions {
        theme: Theme::Catppuccin,
        show_line_numbers: false,
    };
    assert_eq!(render_nvim_init(&editor), render_nvim_init(&editor));
}

#[test]
fn prompt_styles_render_distinct_blocks() {
    let rendered: Vec<String> = PromptStyle::ALL
        .iter()
        .map(|&prompt_style| {
            render_zshrc(&ShellOptions {
                prompt_style,
                plugins: Vec::new(),
            })
        })
        .collect();
    for (i, a) in rendered.iter().enumerate() {
        for b in &rendered[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

// ---------------------------------------------------------------------------
// Config files
// ---------------------------------------------------------------------------

#[test]
fn rewriting_rc_keeps_a_single_backup() {
    let home = common::TestHome::new();
    let rc = home.write(".zshrc", "# mine\n");
    let bak = home.path().join(".zshrc.bak");
    let resource = ConfigFileResource::new(rc.clone(), "# generated\n".to_string())
        .with_backup(bak.clone());

    assert!(matches!(
        resource.current_state().unwrap(),
        ResourceState::Incorrect { .. }
    ));
    resource.apply().unwrap();
    resource.apply().unwrap();

    assert_eq!(std::fs::read_to_string(&rc).unwrap(), "# generated\n");
    assert_eq!(std::fs::read_to_string(&bak).unwrap(), "# mine\n");
    assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
}

// ---------------------------------------------------------------------------
// Backup staging repository
// ---------------------------------------------------------------------------

#[test]
fn staging_repository_commits_only_changes() {
    let home = common::TestHome::new();
    let staging = home.path().join("dotfiles-backup");
    let repo =
        StagingRepository::open_or_init(&staging, Some("git@example.com:ada/dotfiles.git"))
            .unwrap();
    std::fs::write(staging.join(".zshrc"), "# rc\n").unwrap();

    assert!(matches!(
        repo.commit_all("Back up dotfiles").unwrap(),
        CommitOutcome::Committed { id } if id.len() == 7
    ));
    assert_eq!(
        repo.commit_all("Back up dotfiles").unwrap(),
        CommitOutcome::NothingToCommit
    );

    let reopened = StagingRepository::open_or_init(&staging, None).unwrap();
    assert_eq!(
        reopened.remote_url().as_deref(),
        Some("git@example.com:ada/dotfiles.git")
    );
}

// ---------------------------------------------------------------------------
// Housekeeping
// ---------------------------------------------------------------------------

#[test]
fn only_files_older_than_a_week_are_stale() {
    let home = common::TestHome::new();
    let downloads = home.path().join("Downloads");
    for days in [1, 6, 7, 8, 30] {
        home.aged_file(&downloads, &format!("{days}-days.bin"), days);
    }
    std::fs::create_dir_all(downloads.join("old-folder")).unwrap();

    let stale = stale_files(&downloads, SystemTime::now(), MAX_AGE_DAYS).unwrap();
    let ages: Vec<u64> = stale.iter().map(|f| f.age_days).collect();
    assert_eq!(ages, vec![30, 8]);

    for file in &stale {
        file.apply().unwrap();
    }
    let mut left: Vec<String> = std::fs::read_dir(&downloads)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(left, vec!["1-days.bin", "6-days.bin", "7-days.bin", "old-folder"]);
}
