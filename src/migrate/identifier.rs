//! Package identifiers and the text rewriter.
//!
//! An identifier pair is rewritten in two independent passes: the dotted form
//! (`com.example.old`) and the slashed form (`com/example/old`). Both patterns
//! are escaped so they are always matched literally.

use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::fmt;

use crate::errors::MigrateError;

/// Immutable `(old, new)` package pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    old: String,
    new: String,
}

impl Identifier {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Result<Self, MigrateError> {
        let old = old.into();
        let new = new.into();
        check_dotted(&old)?;
        check_dotted(&new)?;
        if old == new {
            return Err(MigrateError::SameIdentifier(old));
        }
        Ok(Self { old, new })
    }

    pub fn old(&self) -> &str {
        &self.old
    }

    pub fn new_name(&self) -> &str {
        &self.new
    }

    pub fn old_slashed(&self) -> String {
        self.old.replace('.', "/")
    }

    pub fn new_slashed(&self) -> String {
        self.new.replace('.', "/")
    }

    /// True when `text` still mentions the old identifier in either form.
    pub fn appears_in(&self, text: &str) -> bool {
        text.contains(&self.old) || text.contains(&self.old_slashed())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.old, self.new)
    }
}

fn check_dotted(value: &str) -> Result<(), MigrateError> {
    let invalid = |reason: &str| MigrateError::InvalidIdentifier {
        value: value.to_string(),
        reason: reason.to_string(),
    };
    if value.is_empty() {
        return Err(invalid("empty"));
    }
    if value.contains(['/', '\\']) {
        return Err(invalid("must not contain path separators"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }
    if value.split('.').any(str::is_empty) {
        return Err(invalid("empty segment between dots"));
    }
    Ok(())
}

/// Precompiled literal substitution for one identifier pair.
#[derive(Debug, Clone)]
pub struct Rewriter {
    identifier: Identifier,
    dotted: Regex,
    slashed: Regex,
    new_slashed: String,
}

impl Rewriter {
    pub fn new(identifier: &Identifier) -> Result<Self, MigrateError> {
        let compile = |literal: &str| {
            Regex::new(&regex::escape(literal))
                .map_err(|e| MigrateError::Config(format!("pattern for '{literal}': {e}")))
        };
        Ok(Self {
            dotted: compile(identifier.old())?,
            slashed: compile(&identifier.old_slashed())?,
            new_slashed: identifier.new_slashed(),
            identifier: identifier.clone(),
        })
    }

    /// Replace every dotted, then every slashed, occurrence of the old identifier.
    /// Returns `Cow::Borrowed(text)` when nothing matched, so callers can skip writes.
    pub fn rewrite<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let new_dotted = NoExpand(self.identifier.new_name());
        let new_slashed = NoExpand(self.new_slashed.as_str());
        match self.dotted.replace_all(text, new_dotted) {
            Cow::Borrowed(unchanged) => self.slashed.replace_all(unchanged, new_slashed),
            Cow::Owned(once) => {
                if self.slashed.is_match(&once) {
                    Cow::Owned(self.slashed.replace_all(&once, new_slashed).into_owned())
                } else {
                    Cow::Owned(once)
                }
            }
        }
    }
}
