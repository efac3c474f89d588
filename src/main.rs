//! Narrative consistency CLI

use clap::Parser;
use narrative_consistency::cli::{execute, Cli};
use narrative_consistency::init_tracing;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_filter());

    let status = execute(cli.command, |key| std::env::var(key).ok(), &mut std::io::stdout());
    ExitCode::from(status)
}
