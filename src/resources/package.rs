//! Package manager backends and the package resource.
use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::InstallError;
use crate::exec::Executor;
use crate::platform::PackageManager;

/// A request to make one package present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRequest {
    /// Backend package name.
    pub name: String,
    /// Homebrew cask (GUI application) rather than a formula.
    pub cask: bool,
}

impl PackageRequest {
    /// A regular package.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cask: false,
        }
    }

    /// A Homebrew cask. Other backends treat it as a regular package.
    #[must_use]
    pub fn cask(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cask: true,
        }
    }

    /// Name as it appears in installed-package listings (tap prefix dropped).
    #[must_use]
    pub fn listed_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// One package manager.
///
/// Presence checks only read the local package database; nothing is
/// installed speculatively.
pub trait PackageBackend: Send + Sync + std::fmt::Debug {
    /// Which manager this is.
    fn manager(&self) -> PackageManager;

    /// Whether the manager binary is on PATH.
    fn is_available(&self) -> bool;

    /// Whether `request` is already installed.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::QueryFailed`] if the query command cannot run.
    fn is_installed(&self, request: &PackageRequest) -> Result<bool, InstallError>;

    /// Names of every installed package, in one query.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::QueryFailed`] if the listing cannot be produced.
    fn list_installed(&self) -> Result<HashSet<String>, InstallError>;

    /// Install `request`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::CommandFailed`], or for Homebrew formulae
    /// [`InstallError::CaskFallbackFailed`] when the cask retry also fails.
    fn install(&self, request: &PackageRequest) -> Result<(), InstallError>;

    /// Refresh the package index before the first install.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::CommandFailed`] if the update command fails.
    fn refresh(&self) -> Result<(), InstallError> {
        Ok(())
    }
}

/// Select the backend for `manager`.
#[must_use]
pub fn backend_for(manager: PackageManager, executor: Arc<dyn Executor>) -> Arc<dyn PackageBackend> {
    match manager {
        PackageManager::Brew => Arc::new(Brew { executor }),
        PackageManager::Apt => Arc::new(Apt { executor }),
        PackageManager::Pacman => Arc::new(Pacman { executor }),
        PackageManager::Yay => Arc::new(Yay { executor }),
    }
}

fn query_failed(manager: PackageManager, e: &anyhow::Error) -> InstallError {
    InstallError::QueryFailed {
        manager,
        reason: format!("{e:#}"),
    }
}

fn command_failed(manager: PackageManager, package: &str, e: &anyhow::Error) -> InstallError {
    InstallError::CommandFailed {
        package: package.to_string(),
        manager,
        reason: format!("{e:#}"),
    }
}

/// Run a query, returning `true` when it exits zero with non-empty output.
fn query_present(
    executor: &dyn Executor,
    manager: PackageManager,
    program: &str,
    args: &[&str],
) -> Result<bool, InstallError> {
    let result = executor
        .run_unchecked(program, args)
        .map_err(|e| query_failed(manager, &e))?;
    Ok(result.success && !result.stdout.trim().is_empty())
}

/// Run a listing command and collect the first token of each line.
fn list_first_tokens(
    executor: &dyn Executor,
    manager: PackageManager,
    program: &str,
    args: &[&str],
) -> Result<HashSet<String>, InstallError> {
    let result = executor
        .run(program, args)
        .map_err(|e| query_failed(manager, &e))?;
    Ok(result
        .stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(String::from)
        .collect())
}

/// Homebrew (macOS).
#[derive(Debug)]
pub struct Brew {
    executor: Arc<dyn Executor>,
}

impl PackageBackend for Brew {
    fn manager(&self) -> PackageManager {
        PackageManager::Brew
    }

    fn is_available(&self) -> bool {
        self.executor.which("brew")
    }

    fn is_installed(&self, request: &PackageRequest) -> Result<bool, InstallError> {
        let name = request.listed_name();
        if !request.cask
            && query_present(&*self.executor, self.manager(), "brew", &[
                "list",
                "--versions",
                name,
            ])?
        {
            return Ok(true);
        }
        query_present(&*self.executor, self.manager(), "brew", &[
            "list",
            "--cask",
            "--versions",
            name,
        ])
    }

    fn list_installed(&self) -> Result<HashSet<String>, InstallError> {
        let mut set =
            list_first_tokens(&*self.executor, self.manager(), "brew", &["list", "--formula", "-1"])?;
        set.extend(list_first_tokens(
            &*self.executor,
            self.manager(),
            "brew",
            &["list", "--cask", "-1"],
        )?);
        Ok(set)
    }

    fn install(&self, request: &PackageRequest) -> Result<(), InstallError> {
        let name = request.name.as_str();
        if request.cask {
            self.executor
                .run("brew", &["install", "--cask", name])
                .map_err(|e| command_failed(self.manager(), name, &e))?;
            return Ok(());
        }
        let Err(primary) = self.executor.run("brew", &["install", name]) else {
            return Ok(());
        };
        self.executor
            .run("brew", &["install", "--cask", name])
            .map(|_| ())
            .map_err(|fallback| InstallError::CaskFallbackFailed {
                package: name.to_string(),
                primary: format!("{primary:#}"),
                fallback: format!("{fallback:#}"),
            })
    }

    fn refresh(&self) -> Result<(), InstallError> {
        self.executor
            .run("brew", &["update"])
            .map(|_| ())
            .map_err(|e| command_failed(self.manager(), "index", &e))
    }
}

/// apt (Debian, Ubuntu, and unrecognised distributions).
#[derive(Debug)]
pub struct Apt {
    executor: Arc<dyn Executor>,
}

impl PackageBackend for Apt {
    fn manager(&self) -> PackageManager {
        PackageManager::Apt
    }

    fn is_available(&self) -> bool {
        self.executor.which("apt-get")
    }

    fn is_installed(&self, request: &PackageRequest) -> Result<bool, InstallError> {
        let result = self
            .executor
            .run_unchecked("dpkg-query", &["-W", "-f=${Status}", &request.name])
            .map_err(|e| query_failed(self.manager(), &e))?;
        Ok(result.success && result.stdout.contains("install ok installed"))
    }

    fn list_installed(&self) -> Result<HashSet<String>, InstallError> {
        let result = self
            .executor
            .run("dpkg-query", &["-W", "-f=${db:Status-Abbrev} ${Package}\\n"])
            .map_err(|e| query_failed(self.manager(), &e))?;
        Ok(parse_dpkg_listing(&result.stdout))
    }

    fn install(&self, request: &PackageRequest) -> Result<(), InstallError> {
        self.executor
            .run("sudo", &["apt-get", "install", "-y", &request.name])
            .map(|_| ())
            .map_err(|e| command_failed(self.manager(), &request.name, &e))
    }

    fn refresh(&self) -> Result<(), InstallError> {
        self.executor
            .run("sudo", &["apt-get", "update"])
            .map(|_| ())
            .map_err(|e| command_failed(self.manager(), "index", &e))
    }
}

/// Parse `dpkg-query` output of the form `ii  name` into installed names.
fn parse_dpkg_listing(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("ii"))
        .filter_map(|rest| rest.split_whitespace().next())
        .map(|name| name.split(':').next().unwrap_or(name).to_string())
        .collect()
}

/// pacman (Arch-likes without an AUR helper).
#[derive(Debug)]
pub struct Pacman {
    executor: Arc<dyn Executor>,
}

impl PackageBackend for Pacman {
    fn manager(&self) -> PackageManager {
        PackageManager::Pacman
    }

    fn is_available(&self) -> bool {
        self.executor.which("pacman")
    }

    fn is_installed(&self, request: &PackageRequest) -> Result<bool, InstallError> {
        query_present(&*self.executor, self.manager(), "pacman", &[
            "-Q",
            &request.name,
        ])
    }

    fn list_installed(&self) -> Result<HashSet<String>, InstallError> {
        list_first_tokens(&*self.executor, self.manager(), "pacman", &["-Qq"])
    }

    fn install(&self, request: &PackageRequest) -> Result<(), InstallError> {
        self.executor
            .run("sudo", &[
                "pacman",
                "-S",
                "--needed",
                "--noconfirm",
                &request.name,
            ])
            .map(|_| ())
            .map_err(|e| command_failed(self.manager(), &request.name, &e))
    }
}

/// yay AUR helper; resolves both repository and AUR packages.
#[derive(Debug)]
pub struct Yay {
    executor: Arc<dyn Executor>,
}

impl PackageBackend for Yay {
    fn manager(&self) -> PackageManager {
        PackageManager::Yay
    }

    fn is_available(&self) -> bool {
        self.executor.which("yay")
    }

    fn is_installed(&self, request: &PackageRequest) -> Result<bool, InstallError> {
        query_present(&*self.executor, self.manager(), "yay", &["-Q", &request.name])
    }

    fn list_installed(&self) -> Result<HashSet<String>, InstallError> {
        list_first_tokens(&*self.executor, self.manager(), "yay", &["-Qq"])
    }

    fn install(&self, request: &PackageRequest) -> Result<(), InstallError> {
        self.executor
            .run("yay", &["-S", "--needed", "--noconfirm", &request.name])
            .map(|_| ())
            .map_err(|e| command_failed(self.manager(), &request.name, &e))
    }
}

/// A package that can be checked and installed through a backend.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// What to install.
    pub request: PackageRequest,
    backend: &'a dyn PackageBackend,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(request: PackageRequest, backend: &'a dyn PackageBackend) -> Self {
        Self { request, backend }
    }

    /// Determine the resource state from a pre-fetched set of installed
    /// package names.
    ///
    /// This avoids running a per-package query when used with
    /// [`PackageBackend::list_installed`].
    #[must_use]
    pub fn state_from_installed(&self, installed: &HashSet<String>) -> ResourceState {
        if installed.contains(self.request.listed_name()) {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        }
    }
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        let kind = if self.request.cask { " cask" } else { "" };
        format!("{} ({}{kind})", self.request.name, self.backend.manager())
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.backend.install(&self.request)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PackageResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.backend.is_installed(&self.request)? {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
