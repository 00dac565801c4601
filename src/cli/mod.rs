//! Command-line interface for lintpool
//!
//! Clap-based argument surface. Global flags cover configuration and output
//! verbosity; each subcommand lives in its own module under `commands`.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Settings;

pub mod commands;
mod output;

pub use output::Output;

/// Parallel clang-format/clang-tidy checks and git-tag version headers for
/// C++ projects
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "LINTPOOL_CONFIG", global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only output return codes and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check files with clang-format and/or clang-tidy, in parallel
    Check(CheckArgs),
    /// List the candidate files a check would process
    Files(FilesArgs),
    /// Render a version header from the latest git tag
    Version(VersionArgs),
}

/// Arguments for `lintpool check`, mirroring the CI wrapper it replaces.
#[derive(Args)]
pub struct CheckArgs {
    /// Check formatting with clang-format
    #[arg(long)]
    pub format: bool,

    /// Run static analysis with clang-tidy
    #[arg(long)]
    pub tidy: bool,

    /// Apply fixes instead of only reporting
    #[arg(long)]
    pub fix: bool,

    /// Check all candidate files, not only changed ones
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Only check files staged in the index
    #[arg(long)]
    pub index: bool,

    /// Number of tool instances run in parallel (0 = one per CPU)
    #[arg(short = 'j', long = "jobs")]
    pub jobs: Option<usize>,

    /// Pattern selecting candidate file paths
    #[arg(long, value_name = "PATTERN")]
    pub regex: Option<String>,

    /// Header filter passed to clang-tidy
    #[arg(long, value_name = "PATTERN")]
    pub header_filter: Option<String>,

    /// Directory containing the compile command database
    #[arg(short = 'p', long = "build-path", value_name = "PATH")]
    pub build_path: Option<String>,

    /// Path to the clang-format binary
    #[arg(long, value_name = "PATH")]
    pub clang_format_binary: Option<String>,

    /// Path to the clang-tidy binary
    #[arg(long, value_name = "PATH")]
    pub clang_tidy_binary: Option<String>,

    /// Path to the clang-apply-replacements binary
    #[arg(long, value_name = "PATH")]
    pub clang_apply_replacements_binary: Option<String>,

    /// Path to the git binary
    #[arg(long, value_name = "PATH")]
    pub git_binary: Option<String>,
}

/// Arguments for `lintpool files`.
#[derive(Args)]
pub struct FilesArgs {
    /// List all candidate files, not only changed ones
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Only list files staged in the index
    #[arg(long)]
    pub index: bool,

    /// Pattern selecting candidate file paths
    #[arg(long, value_name = "PATTERN")]
    pub regex: Option<String>,

    /// Path to the git binary
    #[arg(long, value_name = "PATH")]
    pub git_binary: Option<String>,
}

/// Arguments for `lintpool version`.
#[derive(Args)]
pub struct VersionArgs {
    /// Output file for the version header; prints to stdout when absent
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to the git binary
    #[arg(long, value_name = "PATH")]
    pub git_binary: Option<String>,
}

impl Cli {
    /// Execute the CLI command and map the result to a process exit code.
    pub fn run(self) -> Result<ExitCode> {
        let output = Output::new(self.verbose, self.quiet);
        let settings = Settings::load(self.config.as_deref())?;

        match self.command {
            Some(Commands::Check(args)) => commands::check::execute(args, &settings, &output),
            Some(Commands::Files(args)) => commands::files::execute(args, &settings, &output),
            Some(Commands::Version(args)) => commands::version::execute(args, &settings, &output),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
