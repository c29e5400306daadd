//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Every flag is optional; unset flags leave config values untouched.
//! - --debug is a shorthand for --log-level debug.

use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Relocate a source package to a new identifier and rewrite every reference.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Rename a source package identifier across a project tree"
)]
pub struct Args {
    /// Identifier being retired (dotted form, e.g. com.example.old).
    #[arg(long, value_name = "ID")]
    pub old_package: Option<String>,

    /// Identifier replacing it.
    #[arg(long, value_name = "ID")]
    pub new_package: Option<String>,

    /// Project root; relative configured paths are resolved against it.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub project_root: Option<PathBuf>,

    /// Retained region scanned for leftover references after cleanup.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub package_root: Option<PathBuf>,

    /// Directories containing the package subtree (comma separated).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub code_roots: Option<Vec<PathBuf>>,

    /// Files or directories rewritten in place (comma separated).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub keep_paths: Option<Vec<PathBuf>>,

    /// Build descriptor probed to detect an already-migrated project.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub descriptor: Option<PathBuf>,

    /// Extensions treated as text (comma separated; kt, .kt and *.kt accepted).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub text_extensions: Option<Vec<String>>,

    /// Extensions copied byte-for-byte without notice (comma separated).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub binary_extensions: Option<Vec<String>>,

    /// Force release minify/shrink on (true) or off (false).
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub enable_hardening: Option<bool>,

    /// Keep the old tree and exit 3 when file counts disagree.
    #[arg(long)]
    pub strict: bool,

    /// Explicit XML config file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Write a commented template config to this path and exit.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub init_config: Option<PathBuf>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Also append logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(v) = &self.old_package {
            cfg.old_package = v.clone();
        }
        if let Some(v) = &self.new_package {
            cfg.new_package = v.clone();
        }
        if let Some(v) = &self.project_root {
            cfg.project_root = v.clone();
        }
        if let Some(v) = &self.package_root {
            cfg.package_root = v.clone();
        }
        if let Some(v) = &self.code_roots {
            cfg.code_roots = v.clone();
        }
        if let Some(v) = &self.keep_paths {
            cfg.keep_paths = v.clone();
        }
        if let Some(v) = &self.descriptor {
            cfg.descriptor = v.clone();
        }
        if let Some(v) = &self.text_extensions {
            cfg.text_extensions = v.clone();
        }
        if let Some(v) = &self.binary_extensions {
            cfg.binary_extensions = v.clone();
        }
        if let Some(b) = self.enable_hardening {
            cfg.enable_hardening = b;
        }
        if self.strict {
            cfg.strict = true;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
