use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use lintpool::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", console::style("✖").red());
            // Precondition and environment problems rank as tool failures.
            ExitCode::from(2)
        }
    }
}
