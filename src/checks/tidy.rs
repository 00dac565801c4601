//! clang-tidy check action and fix application

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::external::{self, ExecutionOutcome};
use crate::pool::TaskOutcome;

/// Per-file clang-tidy invocation against a compile command database, with
/// optional `-export-fixes` into a run-scoped directory.
pub struct TidyCheck<'a> {
    binary: String,
    build_path: String,
    header_filter: String,
    export_dir: Option<PathBuf>,
    output: &'a Output,
}

impl<'a> TidyCheck<'a> {
    pub fn new(
        binary: impl Into<String>,
        build_path: impl Into<String>,
        header_filter: impl Into<String>,
        export_dir: Option<PathBuf>,
        output: &'a Output,
    ) -> Self {
        Self {
            binary: binary.into(),
            build_path: build_path.into(),
            header_filter: header_filter.into(),
            export_dir,
            output,
        }
    }

    /// Run clang-tidy against one file and classify the outcome. Called from
    /// worker threads; all failure modes are returned, never raised.
    pub fn run(&self, file: &str) -> TaskOutcome {
        let mut args = vec![
            "-p".to_string(),
            self.build_path.clone(),
            format!("-header-filter={}", self.header_filter),
        ];

        if let Some(dir) = &self.export_dir {
            match export_fixes_path(dir) {
                Ok(path) => {
                    args.push("-export-fixes".to_string());
                    args.push(path.to_string_lossy().into_owned());
                }
                Err(err) => {
                    return TaskOutcome::Failed {
                        command: format!(
                            "{} {file} (export-fixes staging failed: {err})",
                            external::render_command(&self.binary, &args)
                        ),
                    };
                }
            }
        }
        args.push(file.to_string());

        let command = external::render_command(&self.binary, &args);
        let outcome = external::run_tool(&self.binary, &args);

        if !outcome.launch_failed {
            // One echo call per item keeps the command and its diagnostics
            // together in the interleaved worker output.
            let diagnostics = outcome.stdout.trim_end();
            if diagnostics.is_empty() {
                self.output.echo(&command);
            } else {
                self.output.echo(&format!("{command}\n{diagnostics}"));
            }
        }

        classify(command, &outcome)
    }
}

/// Classification: launch failure or non-zero exit is a hard failure; a
/// `warning:` diagnostic on a clean exit flags the file.
pub fn classify(command: String, outcome: &ExecutionOutcome) -> TaskOutcome {
    if outcome.launch_failed || outcome.exit_code != Some(0) {
        return TaskOutcome::Failed { command };
    }
    if outcome.stdout.contains("warning:") {
        return TaskOutcome::Flagged;
    }
    TaskOutcome::Clean
}

/// Apply all fixes exported during the tidy pass in one
/// clang-apply-replacements run.
pub fn apply_fixes(binary: &str, export_dir: &Path, output: &Output) -> Result<()> {
    let args = vec![
        "-format".to_string(),
        "-style=file".to_string(),
        export_dir.to_string_lossy().into_owned(),
    ];
    let outcome = external::run_tool(binary, &args);
    if !outcome.success() {
        bail!(
            "`{}` failed: {}",
            external::render_command(binary, &args),
            outcome.stderr.trim()
        );
    }
    output.success("Applied clang-tidy fixes");
    Ok(())
}

/// Unique per-item YAML path under the run's export directory. The handle is
/// closed right away so clang-tidy can overwrite the file.
fn export_fixes_path(dir: &Path) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("fixes-")
        .suffix(".yaml")
        .tempfile_in(dir)?;
    let (_, path) = file.keep()?;
    Ok(path)
}
