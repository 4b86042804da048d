//! Public entry for change-review chunking.
//!
//! Given a changed file and a baseline reference:
//!
//! 1) **Read** the current file text (missing file → empty result)
//! 2) **Diff** it against the baseline through a [`git::DiffSource`]
//! 3) **Scan** the unified diff for added new-file line numbers ([`parser`])
//! 4) **Expand & merge** each changed line into a ±radius window, then into
//!    contiguous chunks ([`chunk`])
//! 5) **Render** numbered rows, changed rows marked, chunks joined by
//!    `...snip...`, under a `// File: <path>` banner
//!
//! Errors are typed inside the crate ([`errors`]). The string-returning entry
//! points log them and return an empty string instead.

pub mod chunk;
pub mod errors;
pub mod git;
pub mod parser;
pub mod review;

use context_pack::core::normalize::repo_rel_str;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

use errors::ChunksResult;
use git::DiffSource;

/// Default number of context lines on each side of a changed line.
pub const DEFAULT_WINDOW_RADIUS: usize = 5;

/// Rendered chunks for one file plus the path shown in its banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFile {
    pub display_path: String,
    pub chunks: String,
}

/// Render annotated chunks for `file`, propagating failures.
///
/// # Logging
/// Emits `DEBUG` lines for the diff size, changed-line count and chunk count.
pub fn try_render_review_chunks<S: DiffSource>(
    source: &S,
    file: &Path,
    base: &str,
    radius: usize,
) -> ChunksResult<RenderedFile> {
    let t0 = Instant::now();
    let text = fs::read_to_string(file)?;
    let diff = source.diff_for_file(file, base)?;

    let display_path = match source.repo_root() {
        Ok(root) => repo_rel_str(&root, file),
        Err(err) => {
            debug!(error = %err, "render: repo root unavailable, using full path");
            file.display().to_string()
        }
    };

    if parser::looks_like_binary_patch(&diff) {
        debug!(path = %display_path, "render: binary patch, nothing to show");
        return Ok(RenderedFile {
            display_path,
            chunks: String::new(),
        });
    }

    let changed = parser::changed_lines(&diff);
    let blocks = chunk::build_blocks(&text, &changed, radius);
    debug!(
        path = %display_path,
        diff_bytes = diff.len(),
        changed = changed.len(),
        chunks = blocks.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "render: done"
    );

    let chunks = chunk::render_blocks(&display_path, &blocks);
    Ok(RenderedFile {
        display_path,
        chunks,
    })
}

/// Like [`try_render_review_chunks`], degrading any failure to empty chunks.
pub fn render_review_chunks_with<S: DiffSource>(
    source: &S,
    file: &Path,
    base: &str,
    radius: usize,
) -> RenderedFile {
    match try_render_review_chunks(source, file, base, radius) {
        Ok(r) => r,
        Err(err) => {
            warn!(path = %file.display(), error = %err, "render: failed, returning empty chunks");
            RenderedFile {
                display_path: file.display().to_string(),
                chunks: String::new(),
            }
        }
    }
}

/// Annotated chunk text for `file` against `base`, or `""` on any failure.
pub fn render_review_chunks<S: DiffSource>(source: &S, file: &Path, base: &str) -> String {
    render_review_chunks_with(source, file, base, DEFAULT_WINDOW_RADIUS).chunks
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_support::FakeSource;
    use tempfile::TempDir;

    fn fixture(lines: usize) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("src");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("testFile.ts");
        let body = (1..=lines)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&file, body).unwrap();
        (tmp, file)
    }

    #[test]
    fn single_addition_renders_window_13_to_23() {
        let (tmp, file) = fixture(30);
        let src = FakeSource::new(tmp.path()).with_diff(
            &file,
            "\ndiff --git a/testFile.ts b/testFile.ts\n@@ -17,0 +18,1 @@\n+console.log(\"New line\");\n    ",
        );
        let out = render_review_chunks(&src, &file, "origin/main");

        assert!(out.starts_with("// File: src/testFile.ts\n"));
        assert!(out.contains("  13 |"));
        assert!(out.contains("  18 | 👉"));
        assert!(out.contains("  23 |"));
        assert!(!out.contains("  12 |"));
        assert!(!out.contains("  24 |"));
        assert!(!out.contains(chunk::SNIP));
        assert_eq!(out.matches(chunk::CHANGED_MARKER).count(), 1);
    }

    #[test]
    fn change_at_first_line_never_goes_below_one() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.ts");
        fs::write(&file, "first\nsecond\nthird\nfourth\nfifth").unwrap();
        let src = FakeSource::new(tmp.path()).with_diff(&file, "@@ -0,0 +1,1 @@\n+first\n");

        let out = render_review_chunks(&src, &file, "origin/main");
        assert!(out.contains("   1 | 👉 first"));
        assert!(!out.contains("   0 |"));
        assert!(out.ends_with("   5 | fifth"));
    }

    #[test]
    fn distant_additions_are_two_blocks() {
        let (tmp, file) = fixture(110);
        let src = FakeSource::new(tmp.path()).with_diff(
            &file,
            "@@ -4,0 +5,1 @@\n+let x = 1;\n@@ -104,0 +105,1 @@\n+let y = 2;\n",
        );
        let out = render_review_chunks(&src, &file, "origin/main");
        assert!(out.contains("   5 | 👉"));
        assert!(out.contains(" 105 | 👉"));
        assert_eq!(out.matches(chunk::SNIP).count(), 1);
    }

    #[test]
    fn missing_file_renders_empty() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("gone.ts");
        let src = FakeSource::new(tmp.path()).with_diff(&file, "@@ -1,0 +1,1 @@\n+x\n");
        assert_eq!(render_review_chunks(&src, &file, "origin/main"), "");
        assert!(matches!(
            try_render_review_chunks(&src, &file, "origin/main", 5),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn failing_diff_renders_empty() {
        let (_tmp, file) = fixture(3);
        let src = FakeSource::failing();
        assert_eq!(render_review_chunks(&src, &file, "origin/main"), "");
        assert!(matches!(
            try_render_review_chunks(&src, &file, "origin/main", 5),
            Err(Error::Vcs(_))
        ));
    }
}
