use std::collections::HashSet;
use std::fs;
use std::process::Command as GitCommand;

use crate::error::ReviewError;

/// The pair of commits a pre-push hook hands us via LOCAL_SHA / REMOTE_SHA.
#[derive(Debug, Clone)]
pub struct ChangeRef {
    pub base: String,
    pub head: String,
}

impl ChangeRef {
    /// True when the base is the all-zero sentinel git uses for
    /// "this ref does not exist on the remote yet".
    pub fn base_is_sentinel(&self) -> bool {
        self.base.len() == 40 && self.base.bytes().all(|b| b == b'0')
    }
}

/// Where the changes under review come from.
#[derive(Debug, Clone)]
pub enum DiffSource {
    /// Pre-push: everything between two commits.
    Range(ChangeRef),
    /// Pre-commit: whatever is currently staged.
    Staged,
}

/// A changed file plus its full content at the head state.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

/// Run a git command and capture stdout as String.
fn git_output(args: &[&str]) -> Result<String, ReviewError> {
    let output = GitCommand::new("git")
        .args(args)
        .output()
        .map_err(|e| ReviewError::RepositoryAccess(format!("failed to run git {args:?}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReviewError::RepositoryAccess(format!(
            "git {:?} exited with status {:?}: {}",
            args,
            output.status.code(),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Determine the changed file list and the diff text for a source.
///
/// Files are reported in git's order, deduplicated, and filtered down to
/// paths that still exist as regular files; the diff text is returned
/// verbatim. Any git failure is fatal, no partial result comes back.
pub fn resolve(source: &DiffSource) -> Result<(Vec<String>, String), ReviewError> {
    let (names_raw, diff) = match source {
        DiffSource::Staged => (
            git_output(&["diff", "--cached", "--name-only"])?,
            git_output(&["diff", "--cached"])?,
        ),
        DiffSource::Range(r) if r.base_is_sentinel() => {
            // New branch: no remote commit to compare against, so take the
            // head commit alone as a standalone patch.
            log::info!("No remote commit found, reviewing {} as a standalone patch", r.head);
            (
                git_output(&["diff-tree", "--no-commit-id", "--name-only", "-r", &r.head])?,
                git_output(&["diff-tree", "--no-commit-id", "-p", "-r", &r.head])?,
            )
        }
        DiffSource::Range(r) => {
            let range = format!("{}..{}", r.base, r.head);
            (
                git_output(&["diff", "--name-only", &range])?,
                git_output(&["diff", &range])?,
            )
        }
    };

    let mut files = parse_name_list(&names_raw);
    retain_regular_files(&mut files);

    Ok((files, diff.trim_end().to_string()))
}

/// Parse `--name-only` output: trim, drop blanks, dedup keeping first-seen order.
fn parse_name_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .filter(|l| seen.insert(l.to_string()))
        .map(|l| l.to_string())
        .collect()
}

/// Keep only paths that are regular files right now. Deleted, renamed-away,
/// directory, and symlink entries are dropped without complaint.
fn retain_regular_files(paths: &mut Vec<String>) {
    paths.retain(|p| {
        let keep = fs::symlink_metadata(p)
            .map(|m| m.file_type().is_file())
            .unwrap_or(false);
        if !keep {
            log::debug!("Skipping {p}: not a regular file at inspection time");
        }
        keep
    });
}

/// Read the full content of each path, in order.
///
/// A file that vanishes between resolution and read (racing checkout,
/// `git stash`, ...) is skipped with a warning; the review degrades
/// gracefully with fewer files, so a partial batch is fine here.
pub fn read_contents(paths: &[String]) -> Vec<FileChange> {
    let mut changes = Vec::with_capacity(paths.len());

    for path in paths {
        match fs::read_to_string(path) {
            Ok(content) => changes.push(FileChange {
                path: path.clone(),
                content,
            }),
            Err(e) => {
                let err = ReviewError::FileUnavailable(format!("{path}: {e}"));
                log::warn!("{err}, skipping");
            }
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

    fn change_ref(base: &str, head: &str) -> ChangeRef {
        ChangeRef {
            base: base.to_string(),
            head: head.to_string(),
        }
    }

    #[test]
    fn sentinel_detection() {
        assert!(change_ref(ZERO_SHA, "abc").base_is_sentinel());
        assert!(!change_ref("a0000000000000000000000000000000000000b0", "abc").base_is_sentinel());
        assert!(!change_ref("0000", "abc").base_is_sentinel());
        assert!(!change_ref("", "abc").base_is_sentinel());
    }

    #[test]
    fn name_list_dedups_and_keeps_order() {
        let raw = "src/a.rs\n\nsrc/b.rs\nsrc/a.rs\n  src/c.rs  \n";
        let files = parse_name_list(raw);
        assert_eq!(files, vec!["src/a.rs", "src/b.rs", "src/c.rs"]);
    }

    #[test]
    fn name_list_of_empty_output_is_empty() {
        assert!(parse_name_list("").is_empty());
        assert!(parse_name_list("\n\n").is_empty());
    }

    #[test]
    fn regular_file_filter_drops_dirs_and_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("kept.txt");
        File::create(&file_path)
            .unwrap()
            .write_all(b"hi")
            .unwrap();
        let sub_dir = dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let mut paths = vec![
            file_path.to_string_lossy().to_string(),
            sub_dir.to_string_lossy().to_string(),
            dir.path().join("gone.txt").to_string_lossy().to_string(),
        ];
        retain_regular_files(&mut paths);

        assert_eq!(paths, vec![file_path.to_string_lossy().to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn regular_file_filter_drops_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target.txt");
        File::create(&target).unwrap().write_all(b"hi").unwrap();
        let link = dir.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let mut paths = vec![link.to_string_lossy().to_string()];
        retain_regular_files(&mut paths);

        assert!(paths.is_empty());
    }

    #[test]
    fn read_contents_skips_vanished_files() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.txt");
        File::create(&present)
            .unwrap()
            .write_all(b"# Hi")
            .unwrap();

        let paths = vec![
            present.to_string_lossy().to_string(),
            dir.path().join("vanished.txt").to_string_lossy().to_string(),
        ];
        let changes = read_contents(&paths);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].content, "# Hi");
        assert!(changes[0].path.ends_with("present.txt"));
    }
}
