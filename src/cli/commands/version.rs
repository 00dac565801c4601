//! Render a version header from the latest git tag

use anyhow::Result;
use std::process::ExitCode;

use super::MIN_GIT;
use crate::cli::{Output, VersionArgs};
use crate::config::Settings;
use crate::external;
use crate::version::{GitVersion, write_if_changed};

/// Execute the version command
pub fn execute(args: VersionArgs, settings: &Settings, output: &Output) -> Result<ExitCode> {
    let git_binary = args.git_binary.unwrap_or_else(|| settings.tools.git.clone());
    external::require_min_version(&git_binary, MIN_GIT)?;

    let version = GitVersion::query(&git_binary)?;
    output.verbose(&format!("Derived version {}", version.full()));

    let header = version.render_header();
    match args.output {
        Some(path) => {
            if write_if_changed(&path, &header)? {
                output.success(&format!("Wrote version header to {}", path.display()));
            } else {
                output.info(&format!("Version header unchanged: {}", path.display()));
            }
        }
        None => print!("{header}"),
    }

    Ok(ExitCode::SUCCESS)
}
