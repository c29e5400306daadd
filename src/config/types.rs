//! Core configuration types.
//! - Config holds every run parameter; built once, then shared by reference.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{
    BINARY_EXTENSIONS_DEFAULT, CODE_ROOTS_DEFAULT, DESCRIPTOR_DEFAULT, KEEP_PATHS_DEFAULT,
    NEW_PACKAGE_DEFAULT, OLD_PACKAGE_DEFAULT, PACKAGE_ROOT_DEFAULT, PERFORMANCE_FILE_DEFAULT,
    RULES_FILE_DEFAULT, TEXT_EXTENSIONS_DEFAULT,
};
use crate::errors::MigrateError;
use crate::migrate::{ExtensionPolicy, Identifier, MigrationPair};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Run parameters. Relative paths are resolved against `project_root`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub old_package: String,
    pub new_package: String,
    pub project_root: PathBuf,
    /// Retained region scanned for leftovers after cleanup
    pub package_root: PathBuf,
    /// Each code root holds one relocated package directory
    pub code_roots: Vec<PathBuf>,
    /// Rewritten in place (directories or single files)
    pub keep_paths: Vec<PathBuf>,
    /// Build descriptor probed by the idempotency guard
    pub descriptor: PathBuf,
    pub rules_file: PathBuf,
    pub performance_file: PathBuf,
    pub text_extensions: Vec<String>,
    pub binary_extensions: Vec<String>,
    /// Force release minify/shrink on (true) or off (false)
    pub enable_hardening: bool,
    /// Keep the old tree and fail when file counts disagree
    pub strict: bool,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
}

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            old_package: OLD_PACKAGE_DEFAULT.to_string(),
            new_package: NEW_PACKAGE_DEFAULT.to_string(),
            project_root: PathBuf::from("."),
            package_root: PathBuf::from(PACKAGE_ROOT_DEFAULT),
            code_roots: paths(CODE_ROOTS_DEFAULT),
            keep_paths: paths(KEEP_PATHS_DEFAULT),
            descriptor: PathBuf::from(DESCRIPTOR_DEFAULT),
            rules_file: PathBuf::from(RULES_FILE_DEFAULT),
            performance_file: PathBuf::from(PERFORMANCE_FILE_DEFAULT),
            text_extensions: strings(TEXT_EXTENSIONS_DEFAULT),
            binary_extensions: strings(BINARY_EXTENSIONS_DEFAULT),
            enable_hardening: true,
            strict: false,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Defaults with an explicit identifier pair and project root.
    pub fn new(
        old_package: impl Into<String>,
        new_package: impl Into<String>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            old_package: old_package.into(),
            new_package: new_package.into(),
            project_root: project_root.into(),
            ..Default::default()
        }
    }

    /// Join a configured path onto the project root (absolute paths pass through).
    pub fn resolve(&self, p: &Path) -> PathBuf {
        self.project_root.join(p)
    }

    pub fn identifier(&self) -> Result<Identifier, MigrateError> {
        Identifier::new(self.old_package.trim(), self.new_package.trim())
    }

    pub fn extension_policy(&self) -> Result<ExtensionPolicy, MigrateError> {
        ExtensionPolicy::new(&self.text_extensions, &self.binary_extensions)
    }

    /// One (old, new, boundary) triple per code root.
    pub fn migration_pairs(&self, identifier: &Identifier) -> Vec<MigrationPair> {
        let old_rel = PathBuf::from_iter(identifier.old().split('.'));
        let new_rel = PathBuf::from_iter(identifier.new_name().split('.'));
        self.code_roots
            .iter()
            .map(|root| {
                let boundary = self.resolve(root);
                MigrationPair {
                    source: boundary.join(&old_rel),
                    dest: boundary.join(&new_rel),
                    boundary,
                }
            })
            .collect()
    }

    pub fn keep_roots(&self) -> Vec<PathBuf> {
        self.keep_paths.iter().map(|p| self.resolve(p)).collect()
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.resolve(&self.descriptor)
    }

    pub fn scan_root(&self) -> PathBuf {
        self.resolve(&self.package_root)
    }
}
