//! Unified-diff scanner for a single file.
//!
//! Features:
//! - Works on hunks-only input; file headers (`---`/`+++`) are optional.
//! - Ignores `\ No newline at end of file` marker lines.
//! - `diff --git` drops back to scanning, so concatenated diffs do not bleed
//!   line numbers into each other.
//! - Malformed `@@` lines are skipped, never fatal; a hunk whose line
//!   numbers overflow is abandoned.
//!
//! It produces the set of new-file line numbers that were added.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::debug;

use crate::errors::ParseError;

static HUNK_RE: OnceLock<Regex> = OnceLock::new();

fn hunk_re() -> &'static Regex {
    HUNK_RE.get_or_init(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap())
}

/// `@@ -old_start[,old_count] +new_start[,new_count] @@`.
///
/// Omitted counts default to 1, as in unified diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
}

/// Parse a hunk header line.
///
/// # Example
/// ```
/// use change_chunks::parser::parse_hunk_header;
///
/// let h = parse_hunk_header("@@ -17,0 +18,3 @@ fn main() {").unwrap();
/// assert_eq!((h.new_start, h.new_count), (18, 3));
/// ```
pub fn parse_hunk_header(line: &str) -> Result<HunkHeader, ParseError> {
    let caps = hunk_re()
        .captures(line)
        .ok_or_else(|| ParseError::InvalidHunkHeader(line.to_string()))?;

    let num = |i: usize| -> Result<usize, ParseError> {
        match caps.get(i) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| ParseError::Overflow(line.to_string())),
            None => Ok(1),
        }
    };

    Ok(HunkHeader {
        old_start: num(1)?,
        old_count: num(2)?,
        new_start: num(3)?,
        new_count: num(4)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    InHunk { cursor: usize },
}

/// New-file line numbers marked as additions in `diff`.
pub fn changed_lines(diff: &str) -> BTreeSet<usize> {
    let mut changed = BTreeSet::new();
    let mut state = ScanState::Scanning;

    for line in diff.lines() {
        if line.starts_with("diff --git") {
            state = ScanState::Scanning;
            continue;
        }
        if line.starts_with("@@") {
            match parse_hunk_header(line) {
                Ok(h) => state = ScanState::InHunk { cursor: h.new_start },
                Err(err) => debug!(error = %err, "parser: skipping malformed hunk header"),
            }
            continue;
        }

        let ScanState::InHunk { cursor } = &mut state else {
            continue;
        };

        if line.starts_with("+++ ") || line.starts_with("--- ") || line.starts_with('\\') {
            // File headers and marker lines belong to neither side.
            continue;
        }
        if line.starts_with('-') {
            // Old-file only.
            continue;
        }
        if line.starts_with('+') {
            changed.insert(*cursor);
        }
        if let Some(next) = cursor.checked_add(1) {
            *cursor = next;
            continue;
        }
        debug!("parser: hunk line cursor overflowed, dropping hunk");
        state = ScanState::Scanning;
    }
    changed
}

/// Simple heuristic to detect binary patches or messages in unified diff.
pub fn looks_like_binary_patch(s: &str) -> bool {
    s.contains("GIT binary patch")
        || s.lines().any(|l| {
            l.starts_with("Binary files ") || (l.starts_with("Files ") && l.ends_with(" differ"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_counts_default_to_one() {
        let h = parse_hunk_header("@@ -3 +4 @@").unwrap();
        assert_eq!(
            h,
            HunkHeader {
                old_start: 3,
                old_count: 1,
                new_start: 4,
                new_count: 1
            }
        );
    }

    #[test]
    fn malformed_headers_are_errors() {
        assert!(matches!(
            parse_hunk_header("@@ garbage @@"),
            Err(ParseError::InvalidHunkHeader(_))
        ));
        assert!(matches!(
            parse_hunk_header("@@ -1 +99999999999999999999999 @@"),
            Err(ParseError::Overflow(_))
        ));
    }

    #[test]
    fn overflowing_cursor_abandons_the_hunk() {
        let max = usize::MAX;
        let diff = format!("@@ -1 +{max} @@\n+a\n+b\n@@ -1,0 +3,1 @@\n+c\n");
        assert_eq!(changed_lines(&diff), BTreeSet::from([max, 3]));
    }

    #[test]
    fn single_addition_is_found() {
        let diff = "\ndiff --git a/t.ts b/t.ts\n@@ -17,0 +18,1 @@\n+console.log(\"New line\");\n    ";
        assert_eq!(changed_lines(diff), BTreeSet::from([18]));
    }

    #[test]
    fn context_advances_and_deletions_do_not() {
        let diff = "\
--- a/f.js
+++ b/f.js
@@ -10,4 +10,5 @@
 keep
-old
+new
 keep
+added
\\ No newline at end of file
";
        assert_eq!(changed_lines(diff), BTreeSet::from([11, 13]));
    }

    #[test]
    fn multiple_hunks_and_bad_header_lines() {
        let diff = "@@ -4,0 +5,1 @@\n+x\n@@ nonsense\n+y\n@@ -104,0 +105,1 @@\n+z\n";
        // The malformed header is ignored; `+y` continues the first hunk.
        assert_eq!(changed_lines(diff), BTreeSet::from([5, 6, 105]));
    }

    #[test]
    fn lines_before_any_hunk_are_ignored() {
        assert!(changed_lines("+++ b/x\n+not in a hunk\n").is_empty());
        assert!(changed_lines("").is_empty());
    }

    #[test]
    fn new_file_section_resets_state() {
        let diff = "@@ -1,0 +1,1 @@\n+a\ndiff --git a/b b/b\n+stray\n";
        assert_eq!(changed_lines(diff), BTreeSet::from([1]));
    }

    #[test]
    fn binary_heuristic() {
        assert!(looks_like_binary_patch(
            "diff --git a/x.png b/x.png\nBinary files a/x.png and b/x.png differ\n"
        ));
        assert!(!looks_like_binary_patch("@@ -1 +1 @@\n-a\n+b\n"));
    }
}
