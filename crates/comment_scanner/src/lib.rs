// crates/comment_scanner/src/lib.rs

//! Line-at-a-time classification of `//` and `/* */` comments.
//!
//! String and character literals are not recognised, so a marker inside a
//! literal (for example a URL) is treated as a real comment marker.

/// Opens a comment that runs to the end of the line.
pub const LINE_COMMENT: &str = "//";
/// Opens a block comment.
pub const BLOCK_OPEN: &str = "/*";
/// Closes a block comment.
pub const BLOCK_CLOSE: &str = "*/";

/// Result of scanning a single line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineScan {
    /// True if any part of the line lies inside a comment.
    pub has_comment: bool,
    /// True if the line ends inside an unterminated block comment.
    pub continues_block_comment: bool,
    /// The text of the line that is not part of any comment.
    pub remnant: String,
}

/// Classifies `line` given whether it starts inside a block comment.
///
/// The scan walks the line with a cursor that only moves forward, so any
/// number of comments opening and closing on one line is handled without
/// recursion:
///
/// * inside a block comment, everything up to and including `*/` is skipped;
/// * outside, whichever of `//` and `/*` comes first wins. `//` discards the
///   rest of the line, `/*` enters a block comment.
///
/// # Examples
///
/// ```
/// use comment_scanner::scan_line;
///
/// let scan = scan_line("int x = 1; // c", false);
/// assert!(scan.has_comment);
/// assert!(!scan.continues_block_comment);
/// assert_eq!(scan.remnant, "int x = 1; ");
/// ```
pub fn scan_line(line: &str, inside_block_comment: bool) -> LineScan {
    let mut has_comment = inside_block_comment;
    let mut in_block = inside_block_comment;
    let mut remnant = String::new();
    let mut pos = 0;

    loop {
        let rest = &line[pos..];
        if in_block {
            match rest.find(BLOCK_CLOSE) {
                Some(close) => {
                    pos += close + BLOCK_CLOSE.len();
                    in_block = false;
                }
                None => break,
            }
            continue;
        }

        match first_opener(rest) {
            None => {
                remnant.push_str(rest);
                break;
            }
            Some(Opener::Block(at)) => {
                has_comment = true;
                remnant.push_str(&rest[..at]);
                pos += at + BLOCK_OPEN.len();
                in_block = true;
            }
            Some(Opener::Line(at)) => {
                has_comment = true;
                remnant.push_str(&rest[..at]);
                break;
            }
        }
    }

    LineScan {
        has_comment,
        continues_block_comment: in_block,
        remnant,
    }
}

enum Opener {
    Line(usize),
    Block(usize),
}

/// Finds the earliest comment opener in `text`.
fn first_opener(text: &str) -> Option<Opener> {
    match (text.find(LINE_COMMENT), text.find(BLOCK_OPEN)) {
        (None, None) => None,
        (Some(line), None) => Some(Opener::Line(line)),
        (None, Some(block)) => Some(Opener::Block(block)),
        (Some(line), Some(block)) if block < line => Some(Opener::Block(block)),
        (Some(line), Some(_)) => Some(Opener::Line(line)),
    }
}

/// Carries the block-comment state from one line of a file to the next.
///
/// A tracker is scoped to a single file: create a fresh one per file.
#[derive(Debug, Default)]
pub struct CommentTracker {
    in_block_comment: bool,
}

impl CommentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans the next line of the file and updates the carried state.
    pub fn scan(&mut self, line: &str) -> LineScan {
        let scan = scan_line(line, self.in_block_comment);
        self.in_block_comment = scan.continues_block_comment;
        scan
    }

    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }
}
