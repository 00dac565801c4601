//! Per-file check actions driven by the worker pool
//!
//! Each check builds the external command line for one candidate file, runs
//! it through [`crate::external::run_tool`] and classifies the captured
//! outcome into a [`crate::pool::TaskOutcome`].

pub mod compdb;
pub mod format;
pub mod tidy;

pub use format::FormatCheck;
pub use tidy::TidyCheck;
