//! Nerd Font detection and install.
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::packages::ensure_package;
use super::{Context, Task, TaskResult};
use crate::platform::PackageManager;
use crate::resources::package::PackageRequest;

/// File name prefix shared by the JetBrains Mono font files.
const FONT_FILE_PREFIX: &str = "JetBrainsMono";

/// Package providing the font on each backend.
#[must_use]
pub fn font_request(manager: PackageManager) -> PackageRequest {
    match manager {
        PackageManager::Brew => PackageRequest::cask("font-jetbrains-mono-nerd-font"),
        PackageManager::Apt => PackageRequest::new("fonts-jetbrains-mono"),
        PackageManager::Pacman | PackageManager::Yay => {
            PackageRequest::new("ttf-jetbrains-mono-nerd")
        }
    }
}

/// First installed font file found under any of `dirs`.
fn find_font(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter().find_map(|dir| find_in(dir))
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    let pattern = format!(
        "{}/**/{FONT_FILE_PREFIX}*.[ot]tf",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    glob::glob(&pattern).ok()?.find_map(Result::ok)
}

/// Install the Nerd Font the terminal configs reference.
#[derive(Debug)]
pub struct InstallFont;

impl Task for InstallFont {
    fn name(&self) -> &'static str {
        "Install font"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if let Some(found) = find_font(&ctx.config.paths.font_dirs) {
            ctx.log
                .info(&format!("font already installed: {}", found.display()));
            return Ok(TaskResult::Ok);
        }
        let request = font_request(ctx.backend.manager());
        Ok(ensure_package(ctx, &request)?.task_result())
    }
}
