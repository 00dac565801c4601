//! List the candidate files a check would process
//!
//! Useful for wiring the same file set into other tooling and for debugging
//! pattern configuration. Paths print one per line, in first-seen order.

use anyhow::{Context, Result};
use regex::Regex;
use std::process::ExitCode;

use super::MIN_GIT;
use crate::cli::{FilesArgs, Output};
use crate::config::Settings;
use crate::external;
use crate::git;

/// Execute the files command
pub fn execute(args: FilesArgs, settings: &Settings, output: &Output) -> Result<ExitCode> {
    let git_binary = args.git_binary.unwrap_or_else(|| settings.tools.git.clone());
    external::require_min_version(&git_binary, MIN_GIT)?;

    let regex_source = args.regex.unwrap_or_else(|| settings.check.regex.clone());
    let pattern = Regex::new(&regex_source)
        .with_context(|| format!("Invalid file pattern {regex_source:?}"))?;

    let files = if args.all {
        git::all_files(&git_binary, &pattern)?
    } else {
        git::changed_files(&git_binary, &pattern, args.index)?
    };
    output.verbose(&format!("{} candidate file(s)", files.len()));

    // The listing is the command's output, so it bypasses --quiet.
    for file in &files {
        println!("{file}");
    }

    Ok(ExitCode::SUCCESS)
}
