//! External tool invocation
//!
//! Every binary this tool drives (git, clang-format, clang-tidy,
//! clang-apply-replacements) goes through [`run_tool`]: a synchronous spawn
//! that captures exit code, stdout and stderr. A spawn error is reported as a
//! distinct `launch_failed` condition instead of an `Err`, so per-item
//! failures stay recoverable data inside the worker loop.

use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::process::Command;

use crate::version;

/// Captured result of one external command invocation.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Exit code, if the process ran and was not killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// True when the process could not be spawned at all.
    pub launch_failed: bool,
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        !self.launch_failed && self.exit_code == Some(0)
    }
}

/// Run a command to completion and capture its output. Never fails: a spawn
/// error comes back with `launch_failed` set and the OS error in `stderr`.
pub fn run_tool<S: AsRef<OsStr>>(program: &str, args: &[S]) -> ExecutionOutcome {
    match Command::new(program).args(args).output() {
        Ok(output) => ExecutionOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            launch_failed: false,
        },
        Err(err) => ExecutionOutcome {
            exit_code: None,
            stdout: String::new(),
            stderr: err.to_string(),
            launch_failed: true,
        },
    }
}

/// Render a command line the way it is echoed in summaries.
pub fn render_command<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg.as_ref());
    }
    line
}

/// Verify a tool can be launched by probing `<program> --version`.
pub fn require_tool(program: &str) -> Result<ExecutionOutcome> {
    let probe = run_tool(program, &["--version"]);
    if probe.launch_failed {
        // Distinguish "not on PATH" from other spawn errors.
        which::which(program).map_err(|err| {
            anyhow::anyhow!("Unable to run {program} ({err}). Is the binary correctly specified?")
        })?;
        bail!("Unable to run {program}: {}", probe.stderr.trim());
    }
    if !probe.success() {
        bail!(
            "{program} --version exited with status {}",
            probe
                .exit_code
                .map_or_else(|| "signal".to_string(), |code| code.to_string())
        );
    }
    Ok(probe)
}

/// Verify a tool is present and at least `minimum` (major, minor, patch),
/// read from its `--version` banner.
pub fn require_min_version(program: &str, minimum: (u64, u64, u64)) -> Result<()> {
    let probe = require_tool(program)?;
    let found = version::extract_triple(&probe.stdout)
        .or_else(|| version::extract_triple(&probe.stderr))
        .with_context(|| format!("Could not read a version number from `{program} --version`"))?;

    if found < minimum {
        bail!(
            "{program} {}.{}.{} is older than the required {}.{}.{}",
            found.0,
            found.1,
            found.2,
            minimum.0,
            minimum.1,
            minimum.2
        );
    }
    Ok(())
}
