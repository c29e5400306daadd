//! Tree migrator: copy `source` into `dest`, rewriting text files on the way.
//!
//! The walk is best-effort. A file that cannot be read or written is logged
//! and recorded, and the walk moves on; the verifier catches the gap.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use super::classify::{ExtensionPolicy, Treatment};
use super::decode::{Decoded, read_text};
use super::fsio::{copy_with_metadata, describe_io_error, preserve_metadata, write_new};
use super::identifier::Rewriter;
use crate::errors::FileError;

/// Outcome of migrating one source directory.
#[derive(Debug, Default)]
pub struct TreeReport {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Source root was absent; nothing was done.
    pub source_missing: bool,
    pub rewritten: Vec<PathBuf>,
    pub copied_binary: Vec<PathBuf>,
    /// Copied verbatim but of an unknown type; needs a manual look.
    pub unmatched: Vec<PathBuf>,
    /// Symlinks and other non-regular entries that were not migrated.
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<FileError>,
}

impl TreeReport {
    fn new(source: &Path, dest: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            ..Default::default()
        }
    }
}

/// Mirror `source` under `dest`, applying `policy` to every regular file.
pub fn migrate_tree(source: &Path, dest: &Path, rewriter: &Rewriter, policy: &ExtensionPolicy) -> TreeReport {
    let mut report = TreeReport::new(source, dest);

    if !source.exists() {
        warn!(path = %source.display(), "Source path does not exist; nothing to migrate");
        report.source_missing = true;
        return report;
    }

    if let Err(e) = fs::create_dir_all(dest) {
        let message = describe_io_error("create destination root", dest, &e);
        error!(path = %dest.display(), %message, "Cannot create destination root");
        report.failures.push(FileError::Write {
            path: dest.to_path_buf(),
            message,
        });
        return report;
    }

    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| source.to_path_buf());
                error!(path = %path.display(), error = %e, "Cannot read directory entry");
                report.failures.push(FileError::Read {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let src = entry.path();
        let Ok(rel) = src.strip_prefix(source) else {
            continue;
        };
        let target = dest.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if let Err(e) = fs::create_dir_all(&target) {
                let message = describe_io_error("create directory", &target, &e);
                error!(path = %target.display(), %message, "Cannot mirror directory");
                report.failures.push(FileError::Write { path: target, message });
            }
            continue;
        }

        if !file_type.is_file() {
            warn!(path = %src.display(), "Skipping non-regular entry");
            report.skipped.push(src.to_path_buf());
            continue;
        }

        match policy.classify(src) {
            Treatment::Rewrite => match rewrite_file(src, &target, rewriter) {
                Ok(()) => {
                    info!(path = %target.display(), "Rewrote text file");
                    report.rewritten.push(target);
                }
                Err(e) => {
                    error!(path = %e.path().display(), error = %e, "Copy failed");
                    report.failures.push(e);
                }
            },
            treatment => match copy_with_metadata(src, &target) {
                Ok(_) if treatment == Treatment::CopyKnownBinary => {
                    debug!(path = %src.display(), "Matched file copied verbatim");
                    report.copied_binary.push(target);
                }
                Ok(_) => {
                    warn!(path = %src.display(), "Unmatched file copied verbatim; review manually");
                    report.unmatched.push(src.to_path_buf());
                }
                Err(e) => {
                    error!(path = %e.path().display(), error = %e, "Copy failed");
                    report.failures.push(e);
                }
            },
        }
    }

    report
}

fn rewrite_file(src: &Path, target: &Path, rewriter: &Rewriter) -> Result<(), FileError> {
    let text = match read_text(src) {
        Decoded::Text { text, dropped_bytes } => {
            if dropped_bytes > 0 {
                warn!(path = %src.display(), dropped_bytes, "Invalid UTF-8 dropped while decoding");
            }
            text
        }
        Decoded::Skipped { reason } => {
            return Err(FileError::Read {
                path: src.to_path_buf(),
                message: reason,
            });
        }
    };

    write_new(target, rewriter.rewrite(&text).as_bytes())?;
    if let Err(e) = preserve_metadata(src, target) {
        debug!(error = %e, "metadata not preserved");
    }
    Ok(())
}
