//! Platform detection: OS family and package manager.
use std::fmt;
use std::path::Path;

use crate::error::PlatformError;

/// Identifier file read on Linux to determine the distribution.
pub const OS_RELEASE: &str = "/etc/os-release";

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    /// macOS.
    MacOs,
    /// Debian, Ubuntu, and unknown Linux distributions.
    DebianLike,
    /// Arch and Manjaro.
    ArchLike,
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::DebianLike => write!(f, "debian-like"),
            Self::ArchLike => write!(f, "arch-like"),
        }
    }
}

/// Package manager backend selected for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    /// Homebrew (macOS).
    Brew,
    /// apt (Debian, Ubuntu, and the unknown-distribution fallback).
    Apt,
    /// pacman (Arch-likes without an AUR helper).
    Pacman,
    /// yay AUR helper (Arch-likes where `yay` is on PATH).
    Yay,
}

impl PackageManager {
    /// Binary whose presence on PATH means the backend is usable.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::Apt => "apt-get",
            Self::Pacman => "pacman",
            Self::Yay => "yay",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brew => write!(f, "brew"),
            Self::Apt => write!(f, "apt"),
            Self::Pacman => write!(f, "pacman"),
            Self::Yay => write!(f, "yay"),
        }
    }
}

/// Platform profile for the current system.
///
/// Established once at startup and never re-detected; every package request
/// of the run is routed to [`Platform::manager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS family.
    pub os: OsKind,
    /// The one backend for the run.
    pub manager: PackageManager,
    /// Value of `ID=` from the identifier file (`macos` on macOS).
    pub distro: String,
}

impl Platform {
    /// Create a platform with explicit values.
    #[must_use]
    pub fn new(os: OsKind, manager: PackageManager) -> Self {
        let distro = match os {
            OsKind::MacOs => "macos",
            OsKind::DebianLike => "debian",
            OsKind::ArchLike => "arch",
        };
        Self {
            os,
            manager,
            distro: distro.to_string(),
        }
    }

    /// Detect the current platform.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] on anything other than macOS or
    /// Linux, and [`PlatformError::IdentifierUnreadable`] when the Linux
    /// identifier file cannot be read.
    pub fn detect(has_aur_helper: impl Fn() -> bool) -> Result<Self, PlatformError> {
        let os = std::env::consts::OS;
        let os_release = if os == "linux" {
            Some(read_identifier_file(Path::new(OS_RELEASE))?)
        } else {
            None
        };
        Self::from_identifiers(os, os_release.as_deref(), has_aur_helper)
    }

    /// Map raw platform identifiers to a platform.
    ///
    /// `os` is a `std::env::consts::OS` value; `os_release` is the content of
    /// the identifier file. `has_aur_helper` is only consulted on Arch-likes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] for unknown kernels or a Linux
    /// host without an identifier file.
    pub fn from_identifiers(
        os: &str,
        os_release: Option<&str>,
        has_aur_helper: impl Fn() -> bool,
    ) -> Result<Self, PlatformError> {
        match os {
            "macos" => Ok(Self::new(OsKind::MacOs, PackageManager::Brew)),
            "linux" => {
                let content = os_release.ok_or_else(|| PlatformError::Unsupported {
                    platform: "linux without /etc/os-release".to_string(),
                })?;
                let id = parse_os_release_id(content).unwrap_or_default();
                let (kind, manager) = match id.as_str() {
                    "arch" | "manjaro" => {
                        let manager = if has_aur_helper() {
                            PackageManager::Yay
                        } else {
                            PackageManager::Pacman
                        };
                        (OsKind::ArchLike, manager)
                    }
                    // ubuntu, debian, and anything unrecognised
                    _ => (OsKind::DebianLike, PackageManager::Apt),
                };
                Ok(Self {
                    os: kind,
                    manager,
                    distro: if id.is_empty() { "unknown".to_string() } else { id },
                })
            }
            other => Err(PlatformError::Unsupported {
                platform: other.to_string(),
            }),
        }
    }

    /// Whether the host runs macOS.
    #[must_use]
    pub fn is_macos(&self) -> bool {
        self.os == OsKind::MacOs
    }

    /// Whether the host runs a Linux distribution.
    #[must_use]
    pub fn is_linux(&self) -> bool {
        !self.is_macos()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.distro, self.os, self.manager)
    }
}

/// Read the distribution identifier file.
fn read_identifier_file(path: &Path) -> Result<String, PlatformError> {
    std::fs::read_to_string(path).map_err(|source| PlatformError::IdentifierUnreadable {
        path: path.display().to_string(),
        source,
    })
}

/// Extract the lowercase `ID=` value from an os-release document.
fn parse_os_release_id(content: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("ID="))
        .map(|v| v.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase())
        .find(|v| !v.is_empty())
}
