//! Version-control collaborator.
//!
//! [`DiffSource`] is the seam the renderer and batch collector depend on;
//! [`GitCli`] backs it with the `git` command-line tool. Tests substitute
//! an in-memory implementation.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::errors::VcsError;

/// Changed-file listing and per-file diffs against a baseline.
pub trait DiffSource {
    /// Absolute repository root.
    fn repo_root(&self) -> Result<PathBuf, VcsError>;

    /// `true` when the working directory is inside a repository.
    fn is_repo(&self) -> bool;

    /// Modified, added and untracked files, absolute, first-seen order.
    fn changed_files(&self, base: &str) -> Result<Vec<PathBuf>, VcsError>;

    /// Unified diff of `file` against `base`.
    fn diff_for_file(&self, file: &Path, base: &str) -> Result<String, VcsError>;
}

/// `git` CLI runner bound to a working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
    program: String,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            program: "git".to_string(),
        }
    }

    /// Use a different executable (e.g. a wrapper script).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!(cmd = %command, cwd = %self.workdir.display(), "git: run");

        let out = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| VcsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !out.status.success() {
            return Err(VcsError::CommandFailed {
                command,
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        String::from_utf8(out.stdout).map_err(|_| VcsError::InvalidOutput(command))
    }
}

impl DiffSource for GitCli {
    fn repo_root(&self) -> Result<PathBuf, VcsError> {
        let out = self.run(&["rev-parse", "--show-toplevel"])?;
        let root = out.trim();
        if root.is_empty() {
            return Err(VcsError::NotARepository(self.workdir.display().to_string()));
        }
        Ok(PathBuf::from(root))
    }

    fn is_repo(&self) -> bool {
        self.run(&["rev-parse", "--is-inside-work-tree"])
            .is_ok_and(|s| s.trim() == "true")
    }

    fn changed_files(&self, base: &str) -> Result<Vec<PathBuf>, VcsError> {
        let root = self.repo_root()?;
        let tracked = self.run(&["diff", "--name-status", base])?;
        // `--full-name` keeps untracked paths root-relative when bound to a subdirectory.
        let untracked = self.run(&["ls-files", "--others", "--exclude-standard", "--full-name"])?;

        let mut rels = parse_name_status(&tracked);
        rels.extend(
            untracked
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        );
        Ok(absolutize_unique(&root, rels))
    }

    fn diff_for_file(&self, file: &Path, base: &str) -> Result<String, VcsError> {
        let file = file.to_string_lossy();
        self.run(&["diff", base, "--", file.as_ref()])
    }
}

/// Paths with status `M` or `A` from `git diff --name-status` output.
pub fn parse_name_status(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let (status, path) = line.split_once(char::is_whitespace)?;
            let path = path.trim();
            (matches!(status, "M" | "A") && !path.is_empty()).then(|| path.to_string())
        })
        .collect()
}

/// Join repo-relative paths onto `root`, dropping repeats.
pub fn absolutize_unique(root: &Path, rels: Vec<String>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(rels.len());
    for rel in rels {
        let p = root.join(rel);
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    fn git(dir: &Path, args: &[&str]) {
        let out = Command::new("git").args(args).current_dir(dir).output().unwrap();
        assert!(
            out.status.success(),
            "git {args:?}: {}",
            String::from_utf8_lossy(&out.stderr)
        );
    }

    fn write(root: &Path, rel: &str, body: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, body).unwrap();
    }

    #[test]
    fn name_status_keeps_modified_and_added() {
        let out = "M\tsrc/App.tsx\nD\tsrc/old.js\nA\tsrc/new file.ts\nR100\ta.js\tb.js\n";
        assert_eq!(
            parse_name_status(out),
            vec!["src/App.tsx".to_string(), "src/new file.ts".to_string()]
        );
    }

    #[test]
    fn paths_are_absolutized_and_deduplicated() {
        let got = absolutize_unique(
            Path::new("/repo"),
            vec!["a.js".into(), "b.js".into(), "a.js".into()],
        );
        assert_eq!(got, vec![PathBuf::from("/repo/a.js"), PathBuf::from("/repo/b.js")]);
    }

    #[test]
    fn changed_files_from_a_subdirectory_are_repo_absolute() {
        if !git_available() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap();
        write(&root, "web/src/App.jsx", "export const v = 1;\n");
        git(&root, &["init", "-q"]);
        git(&root, &["add", "."]);
        git(
            &root,
            &[
                "-c",
                "user.name=test",
                "-c",
                "user.email=test@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "-m",
                "init",
            ],
        );
        write(&root, "web/src/App.jsx", "export const v = 2;\n");
        write(&root, "web/src/New.jsx", "export const n = 1;\n");

        let cli = GitCli::new(root.join("web"));
        assert!(cli.is_repo());
        assert_eq!(fs::canonicalize(cli.repo_root().unwrap()).unwrap(), root);

        let files = cli.changed_files("HEAD").unwrap();
        assert_eq!(
            files,
            vec![root.join("web/src/App.jsx"), root.join("web/src/New.jsx")]
        );
        assert!(files.iter().all(|p| p.is_file()));

        let diff = cli.diff_for_file(&files[0], "HEAD").unwrap();
        assert!(diff.contains("+export const v = 2;"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let git = GitCli::new(".").with_program("definitely-not-a-real-vcs-binary");
        assert!(matches!(git.repo_root(), Err(VcsError::Spawn { .. })));
        assert!(!git.is_repo());
    }
}
