// crates/find_comments/src/lib.rs

//! Produces a control document listing every comment-bearing line of a set
//! of files, suitable as input for `remove_comments`.

use anyhow::{Context, Result};
use comment_scanner::CommentTracker;
use std::fs;
use std::path::{Path, PathBuf};

/// The comment-bearing lines of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileComments {
    pub path: PathBuf,
    /// Right-trimmed lines, in file order. Lines inside a block comment are
    /// included even when blank.
    pub lines: Vec<String>,
}

/// Returns every line of `content` that lies at least partly in a comment.
pub fn comment_lines(content: &str) -> Vec<String> {
    let mut tracker = CommentTracker::new();
    content
        .lines()
        .map(str::trim_end)
        .filter(|line| tracker.scan(line).has_comment)
        .map(str::to_string)
        .collect()
}

/// Reads `path` and collects its comment-bearing lines.
pub fn find_comments_in_file<P: AsRef<Path>>(path: P) -> Result<FileComments> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Error reading file {}", path.display()))?;
    let lines = comment_lines(&content);
    log::debug!("{}: {} comment line(s)", path.display(), lines.len());
    Ok(FileComments {
        path: path.to_path_buf(),
        lines,
    })
}

/// Renders the control document block for one file, or nothing if the file
/// has no comments.
///
/// Each block is preceded by a blank line, which the parser treats as a
/// separator rather than an entry.
pub fn render_block(comments: &FileComments) -> String {
    let mut block = String::new();
    if comments.lines.is_empty() {
        return block;
    }
    block.push_str(&format!("\n# {}\n", comments.path.display()));
    for line in &comments.lines {
        block.push_str(line);
        block.push('\n');
    }
    block
}

/// Builds the control document for `paths`, in the given order.
///
/// Stops at the first file that cannot be read.
pub fn build_control_document<I, P>(paths: I) -> Result<String>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut document = String::new();
    for path in paths {
        document.push_str(&render_block(&find_comments_in_file(path)?));
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_comment_lines_follow_block_extent() {
        let content = "int a;\n/* start\n\n end */ int b;\nint c; // tail   \nint d;\n";
        assert_eq!(
            comment_lines(content),
            vec!["/* start", "", " end */ int b;", "int c; // tail"]
        );
    }

    #[test]
    fn test_reopened_block_keeps_collecting() {
        let content = "/* a */ x; /* b\nstill b\nb ends */\nplain;\n";
        assert_eq!(comment_lines(content), vec!["/* a */ x; /* b", "still b", "b ends */"]);
    }

    #[test]
    fn test_render_block_format() {
        let comments = FileComments {
            path: PathBuf::from("dir/file.c"),
            lines: vec!["// one".to_string(), "".to_string()],
        };
        assert_eq!(render_block(&comments), "\n# dir/file.c\n// one\n\n");
    }

    #[test]
    fn test_render_block_without_comments_is_empty() {
        let comments = FileComments {
            path: PathBuf::from("plain.c"),
            lines: Vec::new(),
        };
        assert_eq!(render_block(&comments), "");
    }

    #[test]
    fn test_find_comments_in_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "code();\n// comment\n").unwrap();
        let found = find_comments_in_file(temp_file.path()).unwrap();
        assert_eq!(found.lines, vec!["// comment"]);
    }

    #[test]
    fn test_find_comments_missing_file() {
        let result = find_comments_in_file("does_not_exist.c");
        assert!(result.unwrap_err().to_string().contains("Error reading file"));
    }
}
