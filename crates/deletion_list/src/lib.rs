// crates/deletion_list/src/lib.rs

//! Parses a control document into per-file deletion lists.
//!
//! A control document is a sequence of blocks. Each block starts with a
//! header line beginning with `#` followed by the target path; the lines up
//! to the next header (or end of input) are the exact lines to delete from
//! that file, in order:
//!
//! ```text
//! # path/to/file
//! <exact line to delete>
//! <exact line to delete>
//!
//! # path/to/file2
//! ...
//! ```
//!
//! Content before the first header is ignored. The first header only needs
//! the leading `#`; once a block is open, a header must start with `# ` so
//! that entries such as `#define X 1 // note` stay entries. Parsing never
//! fails on malformed input; it only yields fewer entries.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Marks the first header line.
pub const HEADER_PREFIX: char = '#';
/// Marks every header after the first.
pub const BLOCK_HEADER_PREFIX: &str = "# ";

/// The ordered lines to delete from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionList {
    pub path: PathBuf,
    pub entries: Vec<String>,
}

impl DeletionList {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a control document held in memory.
///
/// Blocks are returned in document order. A path that appears under more
/// than one header yields one list per block.
pub fn parse_control_document(document: &str) -> Vec<DeletionList> {
    let mut parser = ControlParser::default();
    for line in document.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Parses a control document from a buffered reader.
pub fn read_control_document<R: BufRead>(reader: R) -> Result<Vec<DeletionList>> {
    let mut parser = ControlParser::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Error reading control document line {}", index + 1))?;
        parser.feed(&line);
    }
    Ok(parser.finish())
}

/// Opens and parses the control document at `path`.
pub fn read_control_file<P: AsRef<Path>>(path: P) -> Result<Vec<DeletionList>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Error opening control document {}", path.display()))?;
    read_control_document(BufReader::new(file))
        .with_context(|| format!("Error reading control document {}", path.display()))
}

/// Incremental parser holding one line of lookahead.
///
/// The most recent body line is held back until the following line is seen.
/// When that following line is a header, an empty held line is the blank
/// separator written before every header and is dropped instead of becoming
/// the block's last entry. Anything else held is flushed into the block.
#[derive(Debug, Default)]
struct ControlParser {
    blocks: Vec<DeletionList>,
    current: Option<DeletionList>,
    held: Option<String>,
    seen_header: bool,
}

impl ControlParser {
    fn feed(&mut self, raw: &str) {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(path) = self.header_path(line) {
            self.seen_header = true;
            if let Some(held) = self.held.take() {
                if !held.is_empty() {
                    self.push_entry(held);
                }
            }
            self.close_block();
            let path = path.trim();
            if path.is_empty() {
                log::warn!("Skipping block with an empty path header");
            } else {
                self.current = Some(DeletionList::new(path));
            }
            return;
        }

        if self.current.is_none() {
            // Before the first header, or inside a skipped block.
            return;
        }
        if let Some(previous) = self.held.replace(line.to_string()) {
            self.push_entry(previous);
        }
    }

    fn header_path<'a>(&self, line: &'a str) -> Option<&'a str> {
        if self.seen_header {
            line.strip_prefix(BLOCK_HEADER_PREFIX)
        } else {
            line.strip_prefix(HEADER_PREFIX)
        }
    }

    fn push_entry(&mut self, entry: String) {
        if let Some(block) = self.current.as_mut() {
            block.entries.push(entry);
        }
    }

    fn close_block(&mut self) {
        if let Some(block) = self.current.take() {
            log::debug!(
                "Parsed {} deletion entries for {}",
                block.entries.len(),
                block.path.display()
            );
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<DeletionList> {
        if let Some(held) = self.held.take() {
            self.push_entry(held);
        }
        self.close_block();
        self.blocks
    }
}
