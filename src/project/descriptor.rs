//! Build-descriptor hardening patcher.
//!
//! Substitutions are scoped to `release { ... }` / `debug { ... }` blocks with a
//! non-greedy match that stops at the first closing brace. This is textual
//! find-and-replace, not a Gradle parser.

use regex::Regex;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::MigrateError;
use crate::migrate::decode::{Decoded, read_text};
use crate::migrate::fsio::replace_contents;

fn scoped(block: &str, setting: &str, from: &str) -> Result<Regex, MigrateError> {
    let pattern = format!(r"(?s)({block}\s*\{{[^}}]*?){setting}\s+{from}");
    Regex::new(&pattern).map_err(|e| MigrateError::Config(format!("descriptor pattern: {e}")))
}

fn substitute<'t>(text: Cow<'t, str>, re: &Regex, setting: &str, to: &str) -> Cow<'t, str> {
    if !re.is_match(&text) {
        return text;
    }
    let replacement = format!("${{1}}{setting} {to}");
    Cow::Owned(re.replace_all(&text, replacement.as_str()).into_owned())
}

/// Patch descriptor text. With `hardening`, release builds get minify and
/// resource shrinking and debug builds get minify forced off; without it,
/// release builds get both switched off.
pub fn patch_text(text: &str, hardening: bool) -> Result<Cow<'_, str>, MigrateError> {
    let mut out = Cow::Borrowed(text);
    if hardening {
        out = substitute(out, &scoped("release", "minifyEnabled", "false")?, "minifyEnabled", "true");
        out = substitute(out, &scoped("debug", "minifyEnabled", "true")?, "minifyEnabled", "false");
        out = substitute(out, &scoped("release", "shrinkResources", "false")?, "shrinkResources", "true");
    } else {
        out = substitute(out, &scoped("release", "minifyEnabled", "true")?, "minifyEnabled", "false");
        out = substitute(out, &scoped("release", "shrinkResources", "true")?, "shrinkResources", "false");
    }
    Ok(out)
}

/// Patch the descriptor on disk. Returns whether it changed.
pub fn patch_file(path: &Path, hardening: bool) -> Result<bool, MigrateError> {
    let text = match read_text(path) {
        Decoded::Text { text, .. } => text,
        Decoded::Skipped { reason } => return Err(MigrateError::Config(reason)),
    };
    let patched = patch_text(&text, hardening)?;
    if patched == text.as_str() {
        debug!(path = %path.display(), hardening, "Descriptor build types already as requested");
        return Ok(false);
    }
    replace_contents(path, patched.as_bytes()).map_err(|e| MigrateError::Config(e.to_string()))?;
    info!(path = %path.display(), hardening, "Patched descriptor build types");
    Ok(true)
}
