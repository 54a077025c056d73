// crates/remove_comments/src/lib.rs

//! Applies a control document to the files it names, one file at a time.

use anyhow::Result;
use deletion_list::{read_control_file, DeletionList};
use line_reconciler::{remove_lines_from_file, MatchShortfall};
use std::path::{Path, PathBuf};

/// Options for a removal run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Reconcile and report without writing any file.
    pub dry_run: bool,
}

/// A file that could not be read or written.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

/// What a run did, file by file.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub rewritten: usize,
    pub shortfalls: Vec<MatchShortfall>,
    pub failures: Vec<FileFailure>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Reads the control document at `control_path` and applies it.
///
/// Only a control document that cannot be read is an error here; problems
/// with individual files are collected in the summary.
pub fn run<P: AsRef<Path>>(control_path: P, options: &RunOptions) -> Result<RunSummary> {
    let lists = read_control_file(control_path)?;
    Ok(apply_deletion_lists(&lists, options))
}

/// Applies each deletion list in order.
///
/// Every block is attempted even after an earlier file fails; a failed file
/// is left as it was.
pub fn apply_deletion_lists(lists: &[DeletionList], options: &RunOptions) -> RunSummary {
    let mut summary = RunSummary::default();
    if lists.is_empty() {
        log::info!("Control document names no files; nothing to do");
    }

    for list in lists {
        summary.processed += 1;
        match remove_lines_from_file(&list.path, &list.entries, options.dry_run) {
            Ok(outcome) => {
                if outcome.changed && !options.dry_run {
                    summary.rewritten += 1;
                }
                if let Some(shortfall) = outcome.shortfall {
                    log::warn!(
                        "{} of {} entries unmatched in {}",
                        shortfall.remaining(),
                        shortfall.total,
                        list.path.display()
                    );
                    summary.shortfalls.push(shortfall);
                }
            }
            Err(error) => {
                log::debug!("Failed to process {}: {:#}", list.path.display(), error);
                summary.failures.push(FileFailure {
                    path: list.path.clone(),
                    error,
                });
            }
        }
    }
    summary
}
