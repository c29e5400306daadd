//! Extension-based file treatment policy.
//! No content sniffing: a file's treatment depends only on its extension.

use std::collections::BTreeSet;
use std::path::Path;

use crate::errors::MigrateError;

/// What the migrator does with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    /// Decode as text, rewrite identifiers, write.
    Rewrite,
    /// Byte-exact copy of a known binary format.
    CopyKnownBinary,
    /// Byte-exact copy, flagged for operator review.
    CopyUnknownFlag,
}

/// Closed sets of text-like and known-binary extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPolicy {
    text: BTreeSet<String>,
    binary: BTreeSet<String>,
}

impl ExtensionPolicy {
    /// Build a policy; the two sets must be disjoint.
    pub fn new<T, B>(text: T, binary: B) -> Result<Self, MigrateError>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        let text: BTreeSet<String> = text.into_iter().filter_map(|e| normalize_extension(e.as_ref())).collect();
        let binary: BTreeSet<String> = binary.into_iter().filter_map(|e| normalize_extension(e.as_ref())).collect();
        let overlap: Vec<&str> = text.intersection(&binary).map(String::as_str).collect();
        if !overlap.is_empty() {
            return Err(MigrateError::ExtensionOverlap(overlap.join(", ")));
        }
        Ok(Self { text, binary })
    }

    pub fn classify(&self, path: &Path) -> Treatment {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if self.text.contains(ext) => Treatment::Rewrite,
            Some(ext) if self.binary.contains(ext) => Treatment::CopyKnownBinary,
            _ => Treatment::CopyUnknownFlag,
        }
    }

    pub fn is_text(&self, path: &Path) -> bool {
        self.classify(path) == Treatment::Rewrite
    }
}

/// Accept `kt`, `.kt` and `*.kt`; return the bare extension (case kept).
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let bare = trimmed
        .strip_prefix("*.")
        .or_else(|| trimmed.strip_prefix('.'))
        .unwrap_or(trimmed);
    if bare.is_empty() {
        None
    } else {
        Some(bare.to_string())
    }
}
