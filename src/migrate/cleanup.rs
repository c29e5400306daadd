//! Destructive cleanup of the old subtree and the post-migration audit.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::decode::{Decoded, read_text};
use super::fsio::describe_io_error;
use super::identifier::Identifier;

#[derive(Debug, Default)]
pub struct CleanupOutcome {
    pub source: PathBuf,
    pub removed: bool,
    /// Ancestors that became empty and were removed, innermost first.
    pub pruned: Vec<PathBuf>,
    pub errors: Vec<String>,
}

/// Delete `source`, then prune empty ancestors up to (not including) `stop_at`.
pub fn remove_source(source: &Path, stop_at: &Path) -> CleanupOutcome {
    let mut outcome = CleanupOutcome {
        source: source.to_path_buf(),
        ..Default::default()
    };

    match fs::remove_dir_all(source) {
        Ok(()) => {
            info!(path = %source.display(), "Deleted old package directory");
            outcome.removed = true;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %source.display(), "Old package directory already gone");
        }
        Err(e) => {
            let msg = describe_io_error("remove old package directory", source, &e);
            warn!(path = %source.display(), error = %msg, "Deletion incomplete");
            outcome.errors.push(msg);
        }
    }

    outcome.pruned = prune_empty_parents(source, stop_at);
    outcome
}

/// Walk upward from `start`'s parent, removing each directory that is empty.
/// Stops at the first non-empty ancestor, at `stop_at`, or when `start` is
/// not below `stop_at` at all.
pub fn prune_empty_parents(start: &Path, stop_at: &Path) -> Vec<PathBuf> {
    let mut pruned = Vec::new();
    if !start.starts_with(stop_at) || start == stop_at {
        warn!(
            path = %start.display(),
            boundary = %stop_at.display(),
            "Not below the pruning boundary; leaving ancestors alone"
        );
        return pruned;
    }

    let mut current = start.parent();
    while let Some(dir) = current {
        if dir == stop_at || !dir.starts_with(stop_at) {
            break;
        }
        let empty = match fs::read_dir(dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => false,
        };
        if !empty || fs::remove_dir(dir).is_err() {
            break;
        }
        debug!(path = %dir.display(), "Removed empty ancestor");
        pruned.push(dir.to_path_buf());
        current = dir.parent();
    }
    pruned
}

/// A file under the retained root that still mentions the old identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidualHit {
    pub path: PathBuf,
    pub dotted: bool,
    pub slashed: bool,
}

/// Report (never modify) every file under `root` still containing the old
/// identifier in dotted or slashed form.
pub fn scan_residual(root: &Path, identifier: &Identifier) -> Vec<ResidualHit> {
    let old_slashed = identifier.old_slashed();
    let mut hits = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let Decoded::Text { text, .. } = read_text(entry.path()) else {
            continue;
        };
        let dotted = text.contains(identifier.old());
        let slashed = text.contains(&old_slashed);
        if dotted || slashed {
            warn!(path = %entry.path().display(), "Found old package reference");
            hits.push(ResidualHit {
                path: entry.into_path(),
                dotted,
                slashed,
            });
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn prunes_nested_only_chain_up_to_boundary() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let kotlin = tmp.child("kotlin");
        let old = kotlin.child("com/example/old");
        old.child("A.kt").touch().unwrap();

        let outcome = remove_source(old.path(), kotlin.path());

        assert!(outcome.removed);
        assert!(!kotlin.path().join("com").exists());
        assert!(kotlin.path().is_dir(), "boundary must survive");
        assert_eq!(outcome.pruned.len(), 2);
    }

    #[test]
    fn stops_at_first_non_empty_ancestor() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let kotlin = tmp.child("kotlin");
        kotlin.child("com/example/old/A.kt").touch().unwrap();
        kotlin.child("com/example/new/A.kt").touch().unwrap();

        let outcome = remove_source(&kotlin.path().join("com/example/old"), kotlin.path());

        assert!(outcome.pruned.is_empty());
        assert!(kotlin.path().join("com/example/new/A.kt").exists());
    }

    #[test]
    fn refuses_to_prune_outside_boundary() {
        let tmp = assert_fs::TempDir::new().unwrap();
        tmp.child("a/b").create_dir_all().unwrap();
        let pruned = prune_empty_parents(&tmp.path().join("a/b/c"), &tmp.path().join("elsewhere"));
        assert!(pruned.is_empty());
        assert!(tmp.path().join("a/b").exists());
    }

    #[test]
    fn residual_scan_reports_both_forms() {
        let id = Identifier::new("com.example.old", "com.example.new").unwrap();
        let tmp = assert_fs::TempDir::new().unwrap();
        tmp.child("a.xml").write_str("com.example.old").unwrap();
        tmp.child("b.txt").write_str("see com/example/old/x").unwrap();
        tmp.child("c.kt").write_str("com.example.new").unwrap();
        let hits = scan_residual(tmp.path(), &id);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].dotted && !hits[0].slashed);
        assert!(!hits[1].dotted && hits[1].slashed);
        tmp.child("a.xml").assert("com.example.old");
    }
}
