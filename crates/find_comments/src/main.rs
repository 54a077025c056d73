// crates/find_comments/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use find_comments::build_control_document;
use std::io::{self, BufRead};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = Command::new("find_comments")
        .version("0.1.0")
        .about("Lists the comment lines of the given files as a control document for remove_comments")
        .arg(
            Arg::new("files")
                .num_args(0..)
                .help("Files to scan; read one path per line from stdin when omitted"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let mut paths: Vec<String> = matches
        .get_many::<String>("files")
        .unwrap_or_default()
        .cloned()
        .collect();
    if paths.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read file list from stdin")?;
            let path = line.trim();
            if !path.is_empty() {
                paths.push(path.to_string());
            }
        }
    }

    let document = build_control_document(&paths)?;
    print!("{}", document);
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
