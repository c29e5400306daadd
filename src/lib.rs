//! Core library for `pkg_migrate`.
//!
//! Relocates a source package from one dotted identifier to another, rewrites
//! every textual reference, verifies the move and removes the old tree.
//! The pipeline lives in [`migrate::run`]; a `Config` value drives every stage.

pub mod cli;
pub mod config;
pub mod errors;
pub mod migrate;
pub mod output;
pub mod platform;
pub mod project;

pub use config::{
    CONFIG_ENV, Config, LogLevel, PROJECT_CONFIG_NAME, create_template_config, find_config_path,
    load_config_from_xml_path, path_has_symlink_ancestor,
};
pub use errors::{FileError, MigrateError, exit};
pub use migrate::{ExtensionPolicy, Identifier, MigrationReport, Rewriter, Treatment, run};
