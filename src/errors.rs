//! Typed error definitions for pkg_migrate.
//!
//! Two tiers:
//! - `MigrateError` decides the fate of the whole run (and the process exit code).
//! - `FileError` is recorded per file in the report and never aborts a walk.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub mod exit {
    pub const COMPLETED: u8 = 0;
    pub const ALREADY_MIGRATED: u8 = 1;
    pub const SETUP: u8 = 2;
    pub const VERIFY_FAILED: u8 = 3;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Package name already updated: {0} contains no occurrence of the old identifier")]
    AlreadyMigrated(PathBuf),

    #[error("Invalid package identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },

    #[error("Old and new package identifiers are identical: {0}")]
    SameIdentifier(String),

    #[error("Project root does not exist or is not a directory: {0}")]
    ProjectRootInvalid(PathBuf),

    #[error("Migration source exists but is not a directory: {0}")]
    SourceNotDirectory(PathBuf),

    #[error("Old and new package directories are nested: {old_dir} and {new_dir}")]
    NestedPackagePaths { old_dir: PathBuf, new_dir: PathBuf },

    #[error("Build descriptor not found or not a regular file: {0}")]
    DescriptorMissing(PathBuf),

    #[error("Extensions listed as both text and binary: {0}")]
    ExtensionOverlap(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{op} '{path}': {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MigrateError {
    /// Exit code reported by the binary when this error ends the run.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::AlreadyMigrated(_) => exit::ALREADY_MIGRATED,
            _ => exit::SETUP,
        }
    }

    /// Short machine-friendly label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            MigrateError::AlreadyMigrated(_) => "already_migrated",
            MigrateError::InvalidIdentifier { .. } => "invalid_identifier",
            MigrateError::SameIdentifier(_) => "same_identifier",
            MigrateError::ProjectRootInvalid(_) => "project_root_invalid",
            MigrateError::SourceNotDirectory(_) => "source_not_directory",
            MigrateError::NestedPackagePaths { .. } => "nested_package_paths",
            MigrateError::DescriptorMissing(_) => "descriptor_missing",
            MigrateError::ExtensionOverlap(_) => "extension_overlap",
            MigrateError::Config(_) => "config",
            MigrateError::Io { .. } => "io",
        }
    }
}

/// Per-file failure. Logged with its path and kept in the report.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Read failed for {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Write failed for {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Metadata copy failed for {path}: {message}")]
    Metadata { path: PathBuf, message: String },
}

impl FileError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            FileError::Read { path, .. }
            | FileError::Write { path, .. }
            | FileError::Metadata { path, .. } => path,
        }
    }
}
