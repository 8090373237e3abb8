//! Idempotent resource primitives (check + apply pattern).
pub mod checkout;
pub mod config_file;
pub mod fs;
pub mod git_config;
pub mod package;
pub mod repository;
pub mod shell;
pub mod ssh_key;
pub mod stale_file;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
///
/// Resources whose state is determined via a single external bulk query (e.g.
/// the installed-package listing) implement only this trait and receive their
/// state from the caller.  Resources that can determine their own state
/// independently implement the richer [`Resource`] super-trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// This method should:
    /// - Create parent directories if needed
    /// - Update the resource to match the desired state
    /// - Return the appropriate `ResourceChange` result
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// a failing external command, or other system errors.
    fn apply(&self) -> Result<ResourceChange>;
}

impl<T: Applicable + ?Sized> Applicable for &T {
    fn description(&self) -> String {
        (**self).description()
    }

    fn apply(&self) -> Result<ResourceChange> {
        (**self).apply()
    }
}

/// State of a resource (file, package, git setting, etc.).
///
/// # Examples
///
/// ```
/// use bootstrap_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "/bin/bash".into() };
/// let skip = ResourceState::Invalid { reason: "target is a directory".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied (e.g., target is a directory).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use bootstrap_cli::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "source missing".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped (e.g., missing source file).
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
///
/// Extends [`Applicable`] with state-checking methods for resources that can
/// independently determine their own state (e.g. config files, git settings,
/// the SSH key).
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined due to I/O
    /// failures, permission issues, or other system errors.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the current state cannot be determined (propagates
    /// errors from `current_state()`).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}

impl<T: Resource + ?Sized> Resource for &T {
    fn current_state(&self) -> Result<ResourceState> {
        (**self).current_state()
    }
}
