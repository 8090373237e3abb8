//! Workstation bootstrap engine.
//!
//! Brings a fresh macOS or Linux machine to a known state: base packages,
//! terminal emulator with a theme, a Nerd Font, Neovim, zsh with zinit and a
//! prompt, a git identity, and an SSH key. Generated dotfiles are committed
//! to a backup repository and old downloads are swept away. Every step checks
//! before it changes anything, so a second run is a no-op.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: settings file and resolved artifact paths
//! - **[`resources`]**: idempotent `check + apply` primitives (packages, files, keys, ...)
//! - **[`tasks`]**: named, ordered units of work wired to resources
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod prompt;
pub mod resources;
pub mod tasks;
pub mod templates;
