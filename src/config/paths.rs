//! Config file discovery and symlink checks.

use dirs::config_dir;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PKG_MIGRATE_CONFIG";
/// Per-project config file looked up in the project root.
pub const PROJECT_CONFIG_NAME: &str = "pkg-migrate.xml";

/// User-level config path (`<config dir>/pkg_migrate/config.xml`).
pub fn user_config_path() -> Option<PathBuf> {
    if let Some(mut base) = config_dir() {
        base.push("pkg_migrate");
        base.push("config.xml");
        Some(base)
    } else {
        env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("pkg_migrate")
                .join("config.xml")
        })
    }
}

/// Pick the config file to load.
///
/// Order: `explicit` (from `--config`), then `$PKG_MIGRATE_CONFIG`, then
/// `<project_root>/pkg-migrate.xml`, then the user config file. The first two
/// are returned even when missing so the loader can report them; the last
/// two only when they exist.
pub fn find_config_path(explicit: Option<&Path>, project_root: &Path) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(p));
    }
    let project = project_root.join(PROJECT_CONFIG_NAME);
    if project.is_file() {
        return Some(project);
    }
    user_config_path().filter(|p| p.is_file())
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
