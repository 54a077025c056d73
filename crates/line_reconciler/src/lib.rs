// crates/line_reconciler/src/lib.rs

//! Removes an ordered list of known comment lines from a source file.
//!
//! The file is walked once with a [`CommentTracker`]. Only lines that carry
//! a comment, or are blank, are candidates; each candidate is compared with
//! the next expected entry and the cursor only moves forward. A blank entry
//! is honoured only directly after another deleted line, so a stray blank
//! line is never removed on its own.

use anyhow::{Context, Result};
use comment_scanner::CommentTracker;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Deletion entries that were never found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchShortfall {
    pub path: PathBuf,
    /// Number of entries in the deletion list.
    pub total: usize,
    /// Unmatched entries with their index in the list, in list order.
    pub unmatched: Vec<(usize, String)>,
}

impl MatchShortfall {
    pub fn remaining(&self) -> usize {
        self.unmatched.len()
    }
}

impl fmt::Display for MatchShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} unmatched comments for file {}",
            self.remaining(),
            self.total,
            self.path.display()
        )?;
        for (index, entry) in &self.unmatched {
            write!(f, "\n    [{}]: {}", index, entry)?;
        }
        Ok(())
    }
}

/// Outcome of reconciling one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The rewritten content.
    pub content: String,
    /// Number of entries that matched a line.
    pub matched: usize,
    /// Entries from the cursor onwards that were never matched.
    pub unmatched: Vec<(usize, String)>,
}

impl Reconciliation {
    pub fn shortfall(&self, path: &Path, total: usize) -> Option<MatchShortfall> {
        if self.unmatched.is_empty() {
            return None;
        }
        Some(MatchShortfall {
            path: path.to_path_buf(),
            total,
            unmatched: self.unmatched.clone(),
        })
    }
}

/// Removes `entries` from `content`.
///
/// Both the file lines and the entries are compared right-trimmed.
/// Kept lines are copied byte-for-byte, line terminator included. When a
/// deleted line has code outside its comment, that code (right-trimmed) takes
/// the deleted line's place, ending with the same terminator.
pub fn reconcile(content: &str, entries: &[String]) -> Reconciliation {
    let mut tracker = CommentTracker::new();
    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;
    let mut last_was_match = false;

    for raw in content.split_inclusive('\n') {
        let text = raw.trim_end();
        let scan = tracker.scan(text);

        let target = match entries.get(cursor) {
            Some(target) if scan.has_comment || text.is_empty() => target.trim_end(),
            _ => {
                output.push_str(raw);
                last_was_match = false;
                continue;
            }
        };

        if text != target || (target.is_empty() && !last_was_match) {
            output.push_str(raw);
            last_was_match = false;
            continue;
        }

        let remnant = scan.remnant.trim_end();
        if !remnant.trim_start().is_empty() {
            output.push_str(remnant);
            output.push_str(line_terminator(raw));
        }
        cursor += 1;
        last_was_match = true;
    }

    Reconciliation {
        content: output,
        matched: cursor,
        unmatched: entries
            .iter()
            .enumerate()
            .skip(cursor)
            .map(|(index, entry)| (index, entry.clone()))
            .collect(),
    }
}

fn line_terminator(raw: &str) -> &str {
    if raw.ends_with("\r\n") {
        "\r\n"
    } else if raw.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Summary of rewriting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub matched: usize,
    /// Whether the file content changed (and, unless dry-running, was written).
    pub changed: bool,
    pub shortfall: Option<MatchShortfall>,
}

/// Reconciles the file at `path` against `entries` and rewrites it in place.
///
/// The file is read fully and the new content is staged in a temporary file
/// next to it, which then replaces the original, so a failure never leaves a
/// partially written file behind. An unchanged file is not rewritten. With
/// `dry_run` set nothing is written at all.
pub fn remove_lines_from_file<P: AsRef<Path>>(
    path: P,
    entries: &[String],
    dry_run: bool,
) -> Result<FileOutcome> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Error reading file {}", path.display()))?;

    let reconciliation = reconcile(&content, entries);
    let changed = reconciliation.content != content;
    log::debug!(
        "{}: matched {} of {} entries",
        path.display(),
        reconciliation.matched,
        entries.len()
    );

    if changed && !dry_run {
        write_atomically(path, &reconciliation.content)?;
        log::info!("Rewrote {}", path.display());
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        matched: reconciliation.matched,
        changed,
        shortfall: reconciliation.shortfall(path, entries.len()),
    })
}

fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Error creating temporary file in {}", dir.display()))?;
    staged
        .write_all(content.as_bytes())
        .with_context(|| format!("Error writing temporary file for {}", path.display()))?;

    let permissions = fs::metadata(path)
        .with_context(|| format!("Error reading metadata of {}", path.display()))?
        .permissions();
    fs::set_permissions(staged.path(), permissions)
        .with_context(|| format!("Error copying permissions of {}", path.display()))?;

    staged
        .persist(path)
        .with_context(|| format!("Error replacing file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_end_to_end_example() {
        let content = "int a; // init\n/* block\n   comment */ int b;\nint c;\n";
        let entries = list(&["int a; // init", "/* block", "   comment */ int b;"]);
        let result = reconcile(content, &entries);
        assert_eq!(result.content, "int a;\n int b;\nint c;\n");
        assert_eq!(result.matched, 3);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_empty_list_is_identity() {
        let content = "// c\n\n/* x */ y;\r\nno newline at end";
        let result = reconcile(content, &[]);
        assert_eq!(result.content, content);
        assert_eq!(result.matched, 0);
    }

    #[test]
    fn test_code_lines_are_never_matched() {
        // An entry equal to a code line is not a comment and must not match.
        let content = "int x;\n// x\n";
        let result = reconcile(content, &list(&["int x;"]));
        assert_eq!(result.content, content);
        assert_eq!(result.unmatched, vec![(0, "int x;".to_string())]);
    }

    #[test]
    fn test_leading_blank_entry_without_prior_match_is_not_deleted() {
        let content = "\n// c\n";
        let result = reconcile(content, &list(&["", "// c"]));
        assert_eq!(result.content, content);
        assert_eq!(result.matched, 0);
        assert_eq!(result.unmatched.len(), 2);
    }

    #[test]
    fn test_blank_line_inside_deleted_block_is_removed() {
        let content = "/*\n\n  text\n*/\nint y;\n";
        let entries = list(&["/*", "", "  text", "*/"]);
        let result = reconcile(content, &entries);
        assert_eq!(result.content, "int y;\n");
    }

    #[test]
    fn test_blank_line_after_kept_line_breaks_adjacency() {
        // Neither blank line follows a deleted line, so both survive and the
        // cursor stays on the blank entry until the end of the file.
        let content = "// one\nint a;\n\n// two\n\nint b;\n";
        let entries = list(&["// one", "", "// two"]);
        let result = reconcile(content, &entries);
        assert_eq!(result.content, "int a;\n\n// two\n\nint b;\n");
        assert_eq!(result.unmatched, vec![(1, String::new()), (2, "// two".to_string())]);
    }

    #[test]
    fn test_mismatch_keeps_line_and_cursor() {
        let content = "// a\n// unrelated\n// b\n";
        let result = reconcile(content, &list(&["// a", "// b"]));
        assert_eq!(result.content, "// unrelated\n");
        assert_eq!(result.matched, 2);
    }

    #[test]
    fn test_entries_match_only_in_order() {
        let content = "// second\n// first\n";
        let result = reconcile(content, &list(&["// first", "// second"]));
        assert_eq!(result.content, "// second\n");
        assert_eq!(result.unmatched, vec![(1, "// second".to_string())]);
    }

    #[test]
    fn test_trailing_whitespace_on_raw_line_is_ignored() {
        let content = "x = 1; // note   \r\n";
        let result = reconcile(content, &list(&["x = 1; // note"]));
        assert_eq!(result.content, "x = 1;\r\n");
    }

    #[test]
    fn test_trailing_whitespace_on_entry_is_ignored() {
        let result = reconcile("// note  \nint x;\n", &list(&["// note  "]));
        assert_eq!(result.content, "int x;\n");
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_whitespace_only_entry_acts_as_blank() {
        let result = reconcile("/*\n\n*/\n", &list(&["/*", "   ", "*/"]));
        assert_eq!(result.content, "");
    }

    #[test]
    fn test_remnant_on_last_line_without_newline() {
        let result = reconcile("a;\nb; /* c */", &list(&["b; /* c */"]));
        assert_eq!(result.content, "a;\nb;");
    }

    #[test]
    fn test_whitespace_only_remnant_is_dropped() {
        let result = reconcile("   // indented comment\n", &list(&["   // indented comment"]));
        assert_eq!(result.content, "");
    }

    #[test]
    fn test_shortfall_reports_unmatched_in_order() {
        let entries = list(&["// a", "// missing 1", "// missing 2"]);
        let result = reconcile("// a\n", &entries);
        let shortfall = result.shortfall(Path::new("f.c"), entries.len()).unwrap();
        assert_eq!(shortfall.remaining(), 2);
        assert_eq!(
            shortfall.to_string(),
            "2 of 3 unmatched comments for file f.c\n    [1]: // missing 1\n    [2]: // missing 2"
        );
    }

    #[test]
    fn test_no_shortfall_when_all_matched() {
        let entries = list(&["// a"]);
        let result = reconcile("// a\n", &entries);
        assert!(result.shortfall(Path::new("f.c"), 1).is_none());
    }
}
