//! Command: print version information.
use std::io::{self, Write};

/// Version reported by the binary: the release tag when built by a release
/// workflow or from git, otherwise the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("BOOTSTRAP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Write the version line to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "bootstrap {}", version())
}
