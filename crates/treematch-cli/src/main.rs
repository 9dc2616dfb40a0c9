//! treematch CLI - canonicalizing SQL equivalence scorer

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use treematch_cli::cli::Args;
use treematch_cli::{evaluate, report};

fn main() -> ExitCode {
    let args = Args::parse();

    // Rule-application traces go to stdout as bare messages when
    // --verbose is set; otherwise only errors surface.
    let level = if args.verbose { Level::DEBUG } else { Level::ERROR };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_level(false)
        .without_time()
        .init();

    match evaluate(&args) {
        Ok(outcome) => {
            print!("{}", report(&outcome, args.etype));
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("treematch: error: {error:#}");
            ExitCode::from(66)
        }
    }
}
