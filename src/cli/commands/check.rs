//! Parallel clang-format / clang-tidy check
//!
//! Orchestrates one run: verify the external tools, discover candidate files
//! through git, filter tidy candidates by the compilation database, drive the
//! worker pool for each requested check and fold the reports into the final
//! exit code (0 clean, 1 needs attention, 2 tool failure).

use anyhow::{Context, Result};
use clap::CommandFactory;
use regex::Regex;
use std::path::Path;
use std::process::ExitCode;

use super::MIN_GIT;
use crate::checks::{FormatCheck, TidyCheck, compdb, tidy};
use crate::cli::{CheckArgs, Cli, Output};
use crate::config::Settings;
use crate::external;
use crate::git;
use crate::pool::{RunReport, Verdict, WorkerPool};

/// Execute the check command
pub fn execute(args: CheckArgs, settings: &Settings, output: &Output) -> Result<ExitCode> {
    if !args.format && !args.tidy {
        output.warning("Nothing to check: pass --format and/or --tidy");
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    }

    let tools = &settings.tools;
    let git_binary = args.git_binary.unwrap_or_else(|| tools.git.clone());
    let clang_format = args
        .clang_format_binary
        .unwrap_or_else(|| tools.clang_format.clone());
    let clang_tidy = args
        .clang_tidy_binary
        .unwrap_or_else(|| tools.clang_tidy.clone());
    let apply_replacements = args
        .clang_apply_replacements_binary
        .unwrap_or_else(|| tools.clang_apply_replacements.clone());

    external::require_min_version(&git_binary, MIN_GIT)?;
    if args.format {
        external::require_tool(&clang_format)?;
    }
    if args.tidy {
        external::require_tool(&clang_tidy)?;
    }

    let regex_source = args.regex.unwrap_or_else(|| settings.check.regex.clone());
    let pattern = Regex::new(&regex_source)
        .with_context(|| format!("Invalid file pattern {regex_source:?}"))?;

    let files = if args.all {
        git::all_files(&git_binary, &pattern)?
    } else {
        git::changed_files(&git_binary, &pattern, args.index)?
    };
    output.verbose(&format!("{} candidate file(s)", files.len()));

    let pool = WorkerPool::new(args.jobs.unwrap_or(settings.parallel.jobs));
    output.verbose(&format!(
        "Running up to {} tool instance(s) in parallel",
        pool.workers()
    ));

    let mut verdict = Verdict::Clean;

    // Fixes exported by the tidy pass are applied in one batch afterwards.
    let export_dir = if args.tidy && args.fix {
        external::require_tool(&apply_replacements)?;
        Some(tempfile::tempdir().context("Failed to create export-fixes directory")?)
    } else {
        None
    };

    if args.tidy {
        let build_path = args
            .build_path
            .unwrap_or_else(|| settings.check.build_path.clone());
        let header_filter = args
            .header_filter
            .unwrap_or_else(|| settings.check.header_filter.clone());

        let database = compdb::load_compile_commands(Path::new(&build_path))?;
        let cwd = std::env::current_dir().context("Could not determine working directory")?;
        let candidates = compdb::filter_candidates(&files, &database, &cwd);
        output.verbose(&format!(
            "{} of {} candidate(s) present in the compilation database",
            candidates.len(),
            files.len()
        ));

        let check = TidyCheck::new(
            &clang_tidy,
            build_path,
            header_filter,
            export_dir.as_ref().map(|dir| dir.path().to_path_buf()),
            output,
        );
        let report = pool.run(candidates, |file| check.run(file))?;

        report_failures(&report, output);
        if !report.flagged_items.is_empty() && !output.is_quiet() {
            output.warning("Files with clang-tidy findings:");
            for file in &report.flagged_items {
                output.list_item(file);
            }
        }
        verdict = verdict.worst(report.verdict());
    }

    if let Some(dir) = &export_dir {
        output.step("Applying tidy fixes...");
        if let Err(err) = tidy::apply_fixes(&apply_replacements, dir.path(), output) {
            output.error(&format!("Error applying fixes: {err:#}"));
            verdict = verdict.worst(Verdict::NeedsAttention);
        }
    }

    if args.format {
        let check = FormatCheck::new(&clang_format, args.fix, output);
        let report = pool.run(files, |file| check.run(file))?;

        report_failures(&report, output);
        if !report.flagged_items.is_empty() {
            if !output.is_quiet() {
                output.warning("Files that need formatting:");
                for file in &report.flagged_items {
                    output.list_item(file);
                }
            }
        } else if !args.fix && report.verdict() == Verdict::Clean {
            output.success("No files need to be formatted");
        }
        verdict = verdict.worst(report.verdict());
    }

    Ok(ExitCode::from(verdict.exit_code()))
}

/// Failed commands indicate a tooling problem and print even in quiet mode.
fn report_failures(report: &RunReport<String>, output: &Output) {
    if report.failed_commands.is_empty() {
        return;
    }
    output.error("Failed executing commands:");
    for command in &report.failed_commands {
        output.list_item(command);
    }
}
