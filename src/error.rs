//! Domain-specific error types for the bootstrap engine.
//!
//! Internal modules return typed errors while task and command boundaries
//! convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! BootstrapError
//! ├── Platform(PlatformError): detection failures (fatal)
//! ├── Install(InstallError): package manager failures (non-fatal)
//! ├── Publish(PublishError): backup repository and push failures
//! ├── Config(ConfigError): settings file problems
//! └── Interrupted: the operator aborted a prompt (fatal)
//! ```

use thiserror::Error;

use crate::platform::PackageManager;

/// Top-level error type for the bootstrap engine.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Platform detection failed.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// A package could not be queried or installed.
    #[error("Install error: {0}")]
    Install(#[from] InstallError),

    /// The backup repository could not be prepared or published.
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// The settings file is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operator pressed Ctrl-C or Esc at a prompt.
    #[error("interrupted")]
    Interrupted,
}

/// Errors that arise while identifying the running platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Neither macOS nor a Linux distribution with an identifier file.
    #[error("unsupported platform: {platform}")]
    Unsupported {
        /// Kernel or platform description.
        platform: String,
    },

    /// The distribution identifier file exists but could not be read.
    #[error("cannot read platform identifier file {path}: {source}")]
    IdentifierUnreadable {
        /// Path of the identifier file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from a package backend.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The backend binary is not on PATH.
    #[error("package manager '{manager}' is not installed")]
    PackageManagerMissing {
        /// Backend that is missing.
        manager: PackageManager,
    },

    /// The backend's local package database could not be queried.
    #[error("{manager} query failed: {reason}")]
    QueryFailed {
        /// Backend that was queried.
        manager: PackageManager,
        /// Human-readable failure detail.
        reason: String,
    },

    /// The backend's install command failed.
    #[error("{manager} failed to install '{package}': {reason}")]
    CommandFailed {
        /// Package that could not be installed.
        package: String,
        /// Backend that was used.
        manager: PackageManager,
        /// Human-readable failure detail.
        reason: String,
    },

    /// Both the formula install and the single cask fallback failed.
    #[error("brew failed to install '{package}' as formula ({primary}) and as cask ({fallback})")]
    CaskFallbackFailed {
        /// Package that could not be installed.
        package: String,
        /// Failure of the formula install.
        primary: String,
        /// Failure of the cask fallback.
        fallback: String,
    },
}

/// Errors that arise while publishing the backup staging directory.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The staging directory could not be created or entered.
    #[error("cannot use staging directory {path}: {source}")]
    StagingDirectory {
        /// Staging directory path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A repository operation (init, stage, commit) failed.
    #[error("repository error: {0}")]
    Repository(#[from] git2::Error),

    /// Pushing to the remote failed.
    #[error("push to '{remote}' failed: {reason}")]
    PushFailed {
        /// Remote name.
        remote: String,
        /// Human-readable failure detail.
        reason: String,
    },
}

/// Errors that arise from loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("IO error reading settings file {path}: {source}")]
    Io {
        /// Path to the settings file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the expected schema.
    #[error("invalid settings file {path}: {message}")]
    Parse {
        /// Path to the settings file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// A field holds a value outside its enumerated set.
    #[error("invalid value '{value}' for {field} (expected one of: {expected})")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Offending value.
        value: String,
        /// Comma-separated list of accepted values.
        expected: String,
    },
}

impl PublishError {
    /// Whether this failure must abort the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::StagingDirectory { .. })
    }
}

/// Whether an error escaping a task must abort the whole run.
///
/// Platform detection failures, an unusable staging directory, and an
/// interrupted prompt are fatal; everything else is logged and the run
/// continues.
#[must_use]
pub fn is_fatal(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.downcast_ref::<PlatformError>().is_some()
            || matches!(
                cause.downcast_ref::<BootstrapError>(),
                Some(BootstrapError::Interrupted)
            )
            || cause
                .downcast_ref::<PublishError>()
                .is_some_and(PublishError::is_fatal)
    })
}
