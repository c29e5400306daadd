//! File-count reconciliation between an old and a new subtree.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub old_files: Vec<PathBuf>,
    pub new_files: Vec<PathBuf>,
}

impl VerifyOutcome {
    pub fn old_count(&self) -> usize {
        self.old_files.len()
    }

    pub fn new_count(&self) -> usize {
        self.new_files.len()
    }

    pub fn matched(&self) -> bool {
        self.old_count() == self.new_count()
    }
}

/// Regular files (not directories, not symlinks) under `root`, sorted.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

pub fn verify(source: &Path, dest: &Path) -> VerifyOutcome {
    VerifyOutcome {
        source: source.to_path_buf(),
        dest: dest.to_path_buf(),
        old_files: list_files(source),
        new_files: list_files(dest),
    }
}
