#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `install` command.
//!
//! These tests exercise the full task list produced by [`all_install_tasks`],
//! the task-name based filtering applied by the `--skip` and `--only` CLI
//! flags, and settings loading as the command performs it.

mod common;

use std::collections::HashSet;

use bootstrap_cli::cli::InstallOpts;
use bootstrap_cli::commands::install::select_tasks;
use bootstrap_cli::config::preferences::{Choice as _, PromptStyle, Theme};
use bootstrap_cli::platform::{OsKind, PackageManager, Platform};
use bootstrap_cli::prompt::{AnswerChoices, ChoiceProvider, keys};
use bootstrap_cli::tasks;

fn opts(skip: &[&str], only: &[&str]) -> InstallOpts {
    InstallOpts {
        skip: skip.iter().map(ToString::to_string).collect(),
        only: only.iter().map(ToString::to_string).collect(),
    }
}

// ---------------------------------------------------------------------------
// Snapshot: full install task list
// ---------------------------------------------------------------------------

/// Snapshot of all install task names in their declared order.
///
/// Any addition, removal, or rename of an install task fails this test until
/// the snapshot is deliberately updated.
#[test]
fn install_task_names() {
    let all_tasks = tasks::all_install_tasks();
    let task_names: Vec<&str> = all_tasks.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!("install_task_names", task_names.join("\n"));
}

#[test]
fn install_task_names_are_unique() {
    let tasks = tasks::all_install_tasks();
    let mut seen: HashSet<&str> = HashSet::new();
    for task in &tasks {
        assert!(
            seen.insert(task.name()),
            "duplicate install task name: '{}'",
            task.name()
        );
    }
}

// ---------------------------------------------------------------------------
// --skip / --only
// ---------------------------------------------------------------------------

#[test]
fn skip_filter_excludes_matching_tasks() {
    let all_tasks = tasks::all_install_tasks();
    let selected = select_tasks(&all_tasks, &opts(&["packages"], &[]));
    assert_eq!(selected.len(), all_tasks.len() - 2);
    assert!(
        selected
            .iter()
            .all(|t| !t.name().to_lowercase().contains("packages"))
    );
}

#[test]
fn only_filter_can_include_multiple_tasks() {
    let all_tasks = tasks::all_install_tasks();
    let selected: Vec<&str> = select_tasks(&all_tasks, &opts(&[], &["Terminal"]))
        .iter()
        .map(|t| t.name())
        .collect();
    assert_eq!(
        selected,
        vec!["Install terminal emulator", "Configure terminal theme"]
    );
}

#[test]
fn only_filter_with_no_match_returns_empty() {
    let all_tasks = tasks::all_install_tasks();
    assert!(select_tasks(&all_tasks, &opts(&[], &["zzznomatch"])).is_empty());
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[test]
fn settings_file_drives_config_and_answers() {
    let home = common::TestHome::new();
    let settings = home.write_settings(
        r#"
packages = ["git", "htop"]
casks = ["rectangle"]

[preferences]
terminal = "kitty"
theme = "nord"
prompt_style = "pure"
git_email = "ada@example.com"

[backup]
dir = "~/backup"
remote = "git@example.com:ada/dotfiles.git"

[cleanup]
dir = "~/tmp"
"#,
    );
    let config = home.load(&settings);
    assert_eq!(config.packages, vec!["git", "htop"]);
    assert_eq!(config.backup.dir, home.path().join("backup"));
    assert_eq!(config.cleanup_dir, home.path().join("tmp"));
    assert_eq!(config.preferences.theme, Some(Theme::Nord));

    let answers = AnswerChoices::from_preferences(&config.preferences);
    assert_eq!(answers.get(keys::TERMINAL), Some("kitty"));
    assert_eq!(answers.get(keys::PROMPT_STYLE), Some(PromptStyle::Pure.as_str()));
    assert_eq!(
        answers.text(keys::GIT_EMAIL, "Git email", "").unwrap(),
        "ada@example.com"
    );
    let themes: Vec<String> = ["dracula", "nord"].map(String::from).to_vec();
    assert_eq!(answers.choose(keys::THEME, "Colour theme", &themes, 0).unwrap(), 1);

    let linux = Platform::new(OsKind::DebianLike, PackageManager::Apt);
    let warnings = config.validate(&linux);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].source, "casks");
}

#[test]
fn unknown_theme_is_rejected() {
    let home = common::TestHome::new();
    let settings = home.write_settings("[preferences]\ntheme = \"solarized\"\n");
    let err = bootstrap_cli::config::Config::load(Some(&settings), home.path()).unwrap_err();
    assert!(err.to_string().contains("solarized"), "{err}");
}

#[test]
fn missing_explicit_settings_file_is_an_error() {
    let home = common::TestHome::new();
    let missing = home.path().join("nope.toml");
    assert!(bootstrap_cli::config::Config::load(Some(&missing), home.path()).is_err());
}
