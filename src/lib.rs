//! # lintpool - Parallel C++ lint checks driven by git
//!
//! A wrapper around `clang-format`, `clang-tidy` and
//! `clang-apply-replacements` for C++ project templates. Candidate files come
//! from git plumbing (all tracked files or only changed ones), each file is
//! checked by an external tool instance running on a bounded worker pool, and
//! the aggregated outcomes map to a CI-friendly exit code:
//!
//! - `0` — every file clean
//! - `1` — at least one file needs formatting or has a tidy finding
//! - `2` — a tool could not be launched or exited non-zero
//!
//! It also renders a C/C++ version header from the most recent git tag.
//!
//! ## Quick start
//!
//! ```bash
//! # Check formatting of changed files
//! lintpool check --format
//!
//! # Full static analysis across the repository, fixing what can be fixed
//! lintpool check --tidy --format --fix -a
//!
//! # Regenerate include/common/version.h from the latest tag
//! lintpool version --output include/common/version.h
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod external;
pub mod git;
pub mod pool;
pub mod version;

pub use cli::{Cli, Output};
pub use config::Settings;

/// Result type alias for lintpool operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
