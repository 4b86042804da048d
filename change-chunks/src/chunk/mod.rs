//! Window expansion, chunk merging and annotated rendering.
//!
//! Each changed line pulls in `radius` lines on both sides (clipped to the
//! file). Overlapping or touching windows merge into one chunk. Chunks are
//! rendered as numbered rows, changed rows marked, and joined with
//! [`SNIP`].

use serde::Serialize;
use std::collections::BTreeSet;

/// Separator between non-adjacent chunks.
pub const SNIP: &str = "...snip...";
/// Prefix placed before the text of changed rows.
pub const CHANGED_MARKER: &str = "👉 ";

/// Inclusive, 1-based line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

/// `[line - radius, line + radius]` clipped to `[1, total]`.
///
/// `None` when the line lies past the end of the file.
pub fn window_bounds(line: usize, radius: usize, total: usize) -> Option<(usize, usize)> {
    if line == 0 || line > total {
        return None;
    }
    let s = line.saturating_sub(radius).max(1);
    let e = line.saturating_add(radius).min(total);
    Some((s, e))
}

/// Every line number pulled in by some changed line's window.
pub fn expand_windows(changed: &BTreeSet<usize>, radius: usize, total: usize) -> BTreeSet<usize> {
    let mut included = BTreeSet::new();
    for &line in changed {
        if let Some((s, e)) = window_bounds(line, radius, total) {
            included.extend(s..=e);
        }
    }
    included
}

/// Maximal runs of consecutive line numbers.
pub fn merge_into_chunks(included: &BTreeSet<usize>) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();
    for &n in included {
        match chunks.last_mut() {
            Some(c) if c.end + 1 == n => c.end = n,
            _ => chunks.push(Chunk { start: n, end: n }),
        }
    }
    chunks
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub line: usize,
    pub changed: bool,
    pub text: String,
}

/// Rows of one chunk, in line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBlock {
    pub rows: Vec<RenderedRow>,
}

impl RenderedBlock {
    pub fn render(&self) -> String {
        self.rows
            .iter()
            .map(|r| {
                let marker = if r.changed { CHANGED_MARKER } else { "" };
                format!("{:>4} | {marker}{}", r.line, r.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build one block per chunk from `source`.
pub fn build_blocks(source: &str, changed: &BTreeSet<usize>, radius: usize) -> Vec<RenderedBlock> {
    let lines: Vec<&str> = source.lines().collect();
    let included = expand_windows(changed, radius, lines.len());

    merge_into_chunks(&included)
        .into_iter()
        .map(|c| RenderedBlock {
            rows: (c.start..=c.end)
                .map(|n| RenderedRow {
                    line: n,
                    changed: changed.contains(&n),
                    text: lines[n - 1].to_string(),
                })
                .collect(),
        })
        .collect()
}

/// Banner line followed by blocks joined with [`SNIP`].
///
/// Empty when there are no blocks.
pub fn render_blocks(display_path: &str, blocks: &[RenderedBlock]) -> String {
    if blocks.is_empty() {
        return String::new();
    }
    let body = blocks
        .iter()
        .map(RenderedBlock::render)
        .collect::<Vec<_>>()
        .join(&format!("\n{SNIP}\n"));
    format!("// File: {display_path}\n{body}")
}

/// [`build_blocks`] then [`render_blocks`].
pub fn render_chunks(
    display_path: &str,
    source: &str,
    changed: &BTreeSet<usize>,
    radius: usize,
) -> String {
    render_blocks(display_path, &build_blocks(source, changed, radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (1..=n)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn window_is_clipped_at_both_ends() {
        assert_eq!(window_bounds(1, 5, 30), Some((1, 6)));
        assert_eq!(window_bounds(18, 5, 30), Some((13, 23)));
        assert_eq!(window_bounds(29, 5, 30), Some((24, 30)));
        assert_eq!(window_bounds(31, 5, 30), None);
        assert_eq!(window_bounds(0, 5, 30), None);
    }

    #[test]
    fn touching_windows_merge() {
        let changed = BTreeSet::from([5, 16]);
        let chunks = merge_into_chunks(&expand_windows(&changed, 5, 100));
        assert_eq!(chunks, vec![Chunk { start: 1, end: 21 }]);

        let changed = BTreeSet::from([5, 17]);
        let chunks = merge_into_chunks(&expand_windows(&changed, 5, 100));
        assert_eq!(
            chunks,
            vec![Chunk { start: 1, end: 10 }, Chunk { start: 12, end: 22 }]
        );
    }

    #[test]
    fn single_change_renders_one_contiguous_block() {
        let out = render_chunks("src/t.ts", &numbered(30), &BTreeSet::from([18]), 5);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "// File: src/t.ts");
        assert_eq!(lines.len(), 1 + 11);
        assert_eq!(lines[1], "  13 | line 13");
        assert_eq!(lines[6], "  18 | 👉 line 18");
        assert_eq!(lines[11], "  23 | line 23");
        assert_eq!(out.matches(CHANGED_MARKER).count(), 1);
        assert!(!out.contains(SNIP));
    }

    #[test]
    fn distant_changes_are_snipped() {
        let out = render_chunks("t.ts", &numbered(110), &BTreeSet::from([5, 105]), 5);
        let parts: Vec<&str> = out.split(&format!("\n{SNIP}\n")).collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains("   1 | line 1\n"));
        assert!(parts[0].ends_with("  10 | line 10"));
        assert!(parts[1].starts_with(" 100 | line 100"));
        assert!(parts[1].ends_with(" 110 | line 110"));
        assert!(out.contains("   5 | 👉 line 5"));
        assert!(out.contains(" 105 | 👉 line 105"));
    }

    #[test]
    fn no_changes_render_nothing() {
        assert_eq!(render_chunks("t.ts", &numbered(10), &BTreeSet::new(), 5), "");
    }
}
