//! XML configuration support.
//! - Loads settings from an XML file (quick_xml + serde) on top of a base Config.
//! - Writes a commented template for `--init-config`.
//!
//! List values (code roots, keep paths, extensions) are comma separated.
//! Unknown elements are rejected so typos do not silently fall back to defaults.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::path_has_symlink_ancestor;
use super::types::{Config, LogLevel};
use crate::platform::write_config_secure_new_0600;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    old_package: Option<String>,
    new_package: Option<String>,
    project_root: Option<String>,
    package_root: Option<String>,
    code_roots: Option<String>,
    keep_paths: Option<String>,
    descriptor: Option<String>,
    rules_file: Option<String>,
    performance_file: Option<String>,
    text_extensions: Option<String>,
    binary_extensions: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    enable_hardening: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    strict: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

// Tolerate surrounding whitespace in boolean elements.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<bool>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected true/false, got '{s}'"))),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn apply(parsed: XmlConfig, mut cfg: Config) -> Result<Config> {
    if let Some(v) = non_empty(parsed.old_package) {
        cfg.old_package = v;
    }
    if let Some(v) = non_empty(parsed.new_package) {
        cfg.new_package = v;
    }
    if let Some(v) = non_empty(parsed.project_root) {
        cfg.project_root = PathBuf::from(v);
    }
    if let Some(v) = non_empty(parsed.package_root) {
        cfg.package_root = PathBuf::from(v);
    }
    if let Some(v) = non_empty(parsed.code_roots) {
        cfg.code_roots = split_list(&v).into_iter().map(PathBuf::from).collect();
    }
    if let Some(v) = non_empty(parsed.keep_paths) {
        cfg.keep_paths = split_list(&v).into_iter().map(PathBuf::from).collect();
    }
    if let Some(v) = non_empty(parsed.descriptor) {
        cfg.descriptor = PathBuf::from(v);
    }
    if let Some(v) = non_empty(parsed.rules_file) {
        cfg.rules_file = PathBuf::from(v);
    }
    if let Some(v) = non_empty(parsed.performance_file) {
        cfg.performance_file = PathBuf::from(v);
    }
    if let Some(v) = non_empty(parsed.text_extensions) {
        cfg.text_extensions = split_list(&v);
    }
    if let Some(v) = non_empty(parsed.binary_extensions) {
        cfg.binary_extensions = split_list(&v);
    }
    if let Some(b) = parsed.enable_hardening {
        cfg.enable_hardening = b;
    }
    if let Some(b) = parsed.strict {
        cfg.strict = b;
    }
    if let Some(v) = non_empty(parsed.log_level) {
        cfg.log_level = v.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(v) = non_empty(parsed.log_file) {
        cfg.log_file = Some(PathBuf::from(v));
    }
    if cfg.code_roots.is_empty() {
        bail!("code_roots must name at least one directory");
    }
    Ok(cfg)
}

/// Parse XML text and layer it over `base`.
pub fn parse_config_xml(contents: &str, base: Config) -> Result<Config> {
    let parsed: XmlConfig = from_xml_str(contents).context("parse config xml")?;
    apply(parsed, base)
}

/// Load a config file and layer it over `base`.
pub fn load_config_from_xml_path(path: &Path, base: Config) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    parse_config_xml(&contents, base).with_context(|| format!("in '{}'", path.display()))
}

/// Write a commented template with the current values of `cfg`.
/// Refuses to overwrite an existing file or write through a symlinked ancestor.
pub fn create_template_config(path: &Path, cfg: &Config) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    let join_paths = |v: &[PathBuf]| {
        v.iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",")
    };

    let content = format!(
        "<!--\n  pkg_migrate configuration (XML)\n\n  Paths are relative to project_root unless absolute.\n  Lists are comma separated. CLI flags override these values.\n\n    old_package / new_package -> dotted identifiers (old is renamed to new)\n    package_root              -> retained tree scanned for leftovers after cleanup\n    code_roots                -> directories holding the package subtree to relocate\n    keep_paths                -> rewritten in place (directories or single files)\n    descriptor                -> build file probed to detect an already-migrated project\n    enable_hardening          -> true: release minify/shrink on; false: off\n    strict                    -> true: keep the old tree when file counts differ\n    log_level                 -> quiet | normal | info | debug\n-->\n<config>\n  <old_package>{}</old_package>\n  <new_package>{}</new_package>\n  <package_root>{}</package_root>\n  <code_roots>{}</code_roots>\n  <keep_paths>{}</keep_paths>\n  <descriptor>{}</descriptor>\n  <rules_file>{}</rules_file>\n  <performance_file>{}</performance_file>\n  <text_extensions>{}</text_extensions>\n  <binary_extensions>{}</binary_extensions>\n  <enable_hardening>{}</enable_hardening>\n  <strict>{}</strict>\n  <log_level>{}</log_level>\n</config>\n",
        cfg.old_package,
        cfg.new_package,
        cfg.package_root.display(),
        join_paths(&cfg.code_roots),
        join_paths(&cfg.keep_paths),
        cfg.descriptor.display(),
        cfg.rules_file.display(),
        cfg.performance_file.display(),
        cfg.text_extensions.join(","),
        cfg.binary_extensions.join(","),
        cfg.enable_hardening,
        cfg.strict,
        cfg.log_level,
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}
