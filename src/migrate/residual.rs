//! In-place rewrite of retained paths (files that keep their location).

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use super::classify::ExtensionPolicy;
use super::decode::{Decoded, read_text};
use super::fsio::replace_contents;
use super::identifier::Rewriter;
use crate::errors::FileError;

#[derive(Debug, Default)]
pub struct ResidualReport {
    pub rewritten: Vec<PathBuf>,
    pub failures: Vec<FileError>,
}

/// Canonical form of an excluded region; falls back to the lexical path
/// when the region does not exist.
fn resolve(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// True if `child` resolves to a path inside `region` (or equal to it).
pub fn is_within(child: &Path, region: &Path) -> bool {
    resolve(child).starts_with(resolve(region))
}

/// Walk each root (directory or single file) and rewrite text files in place,
/// skipping anything inside `excluded`. Unchanged files are not touched.
pub fn rewrite_in_place(
    roots: &[PathBuf],
    rewriter: &Rewriter,
    policy: &ExtensionPolicy,
    excluded: &[PathBuf],
) -> ResidualReport {
    let mut report = ResidualReport::default();
    let excluded: Vec<PathBuf> = excluded.iter().map(|p| resolve(p)).collect();

    for root in roots {
        if !root.exists() {
            debug!(path = %root.display(), "Retained path absent; skipping");
            continue;
        }

        let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "Cannot read entry under retained path");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !policy.is_text(entry.path()) {
                continue;
            }
            let path = entry.path();
            let resolved = resolve(path);
            if excluded.iter().any(|region| resolved.starts_with(region)) {
                continue;
            }
            // Keep paths may overlap (a directory and a file inside it).
            if report.rewritten.iter().any(|p| p == path) {
                continue;
            }

            match rewrite_one(path, rewriter) {
                Ok(true) => {
                    info!(path = %path.display(), "Resource file updated");
                    report.rewritten.push(path.to_path_buf());
                }
                Ok(false) => {}
                Err(e) => {
                    error!(path = %path.display(), error = %e, "In-place rewrite failed");
                    report.failures.push(e);
                }
            }
        }
    }

    report
}

/// Rewrite one file in place. Returns whether the content changed.
pub fn rewrite_one(path: &Path, rewriter: &Rewriter) -> Result<bool, FileError> {
    let text = match read_text(path) {
        Decoded::Text { text, .. } => text,
        Decoded::Skipped { reason } => {
            return Err(FileError::Read {
                path: path.to_path_buf(),
                message: reason,
            });
        }
    };
    let rewritten = rewriter.rewrite(&text);
    if rewritten == text.as_str() {
        return Ok(false);
    }
    replace_contents(path, rewritten.as_bytes())?;
    Ok(true)
}
