// crates/remove_comments/src/main.rs

use anyhow::{bail, Result};
use clap::{Arg, ArgAction, Command};
use remove_comments::{run, RunOptions};
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = Command::new("remove_comments")
        .version("0.1.0")
        .about("Removes the lines listed in a control document from the files it names")
        .arg(
            Arg::new("control_path")
                .short('f')
                .long("control-path")
                .num_args(1)
                .required(true)
                .help("Full path to the file specifying the comments to remove"),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .help("Report what would be removed without modifying any file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    // Required by clap, so always present.
    let control_path = matches
        .get_one::<String>("control_path")
        .cloned()
        .unwrap_or_default();
    let options = RunOptions {
        dry_run: matches.get_flag("dry_run"),
    };

    let summary = run(&control_path, &options)?;

    for shortfall in &summary.shortfalls {
        println!("{}", shortfall);
    }
    for failure in &summary.failures {
        eprintln!("Error: {:#}", failure.error);
    }
    println!(
        "Processed {} file(s): {} rewritten, {} with unmatched comments, {} failed",
        summary.processed,
        summary.rewritten,
        summary.shortfalls.len(),
        summary.failures.len()
    );

    if summary.has_failures() {
        bail!("{} file(s) could not be processed", summary.failures.len());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
