//! clang-format check action

use crate::cli::Output;
use crate::external::{self, ExecutionOutcome};
use crate::pool::TaskOutcome;

/// Per-file clang-format invocation: replacement-XML probe in check mode,
/// in-place rewrite in fix mode.
pub struct FormatCheck<'a> {
    binary: String,
    fix: bool,
    output: &'a Output,
}

impl<'a> FormatCheck<'a> {
    pub fn new(binary: impl Into<String>, fix: bool, output: &'a Output) -> Self {
        Self {
            binary: binary.into(),
            fix,
            output,
        }
    }

    fn args_for(&self, file: &str) -> Vec<String> {
        let mode = if self.fix {
            "-i"
        } else {
            "-output-replacements-xml"
        };
        vec!["-style=file".to_string(), mode.to_string(), file.to_string()]
    }

    /// Run clang-format against one file and classify the outcome. Called
    /// from worker threads; all failure modes are returned, never raised.
    pub fn run(&self, file: &str) -> TaskOutcome {
        let args = self.args_for(file);
        let command = external::render_command(&self.binary, &args);
        let outcome = external::run_tool(&self.binary, &args);

        if self.fix && !outcome.launch_failed {
            self.output.step(&command);
        }
        if !outcome.stderr.trim().is_empty() {
            self.output.error(outcome.stderr.trim());
        }

        classify(command, &outcome, self.fix)
    }
}

/// Classification: launch failure or non-zero exit is a hard failure; a
/// replacement marker in check-mode stdout flags the file as needing
/// formatting.
pub fn classify(command: String, outcome: &ExecutionOutcome, fix: bool) -> TaskOutcome {
    if outcome.launch_failed || outcome.exit_code != Some(0) {
        return TaskOutcome::Failed { command };
    }
    if !fix && outcome.stdout.contains("<replacement ") {
        return TaskOutcome::Flagged;
    }
    TaskOutcome::Clean
}
