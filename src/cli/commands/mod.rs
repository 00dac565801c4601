//! Command implementations for the lintpool CLI
//!
//! Each subcommand is organized into its own module and exposes a single
//! `execute` function returning the process exit code.

pub mod check;
pub mod files;
pub mod version;

/// Minimum git version the plumbing invocations rely on.
pub(crate) const MIN_GIT: (u64, u64, u64) = (2, 17, 0);
