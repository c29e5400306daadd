//! Pre-flight validation. Runs before anything on disk is touched.

use tracing::{debug, error, info};

use super::types::Config;
use crate::errors::MigrateError;

impl Config {
    /// Check identifiers, extension sets, the project root, each migration
    /// source and the descriptor. A missing source is allowed (reported later
    /// as a no-op); a source that exists but is not a directory is fatal.
    pub fn validate(&self) -> Result<(), MigrateError> {
        let identifier = self.identifier()?;
        self.extension_policy()?;

        if !self.project_root.is_dir() {
            error!(path = %self.project_root.display(), "Project root invalid");
            return Err(MigrateError::ProjectRootInvalid(self.project_root.clone()));
        }
        if self.code_roots.is_empty() {
            return Err(MigrateError::Config("no code roots configured".into()));
        }

        for pair in self.migration_pairs(&identifier) {
            // Neither directory may contain the other.
            if pair.dest.starts_with(&pair.source) || pair.source.starts_with(&pair.dest) {
                error!(
                    source = %pair.source.display(),
                    dest = %pair.dest.display(),
                    "Old and new package directories are nested"
                );
                return Err(MigrateError::NestedPackagePaths {
                    old_dir: pair.source,
                    new_dir: pair.dest,
                });
            }
            if pair.source.exists() && !pair.source.is_dir() {
                error!(path = %pair.source.display(), "Migration source is not a directory");
                return Err(MigrateError::SourceNotDirectory(pair.source));
            }
            if pair.dest.exists() && !pair.dest.is_dir() {
                error!(path = %pair.dest.display(), "Migration destination is not a directory");
                return Err(MigrateError::Config(format!(
                    "destination exists but is not a directory: {}",
                    pair.dest.display()
                )));
            }
            debug!(source = %pair.source.display(), dest = %pair.dest.display(), "Pair checked");
        }

        let descriptor = self.descriptor_path();
        if !descriptor.is_file() {
            error!(path = %descriptor.display(), "Descriptor missing");
            return Err(MigrateError::DescriptorMissing(descriptor));
        }

        info!(
            identifier = %identifier,
            project_root = %self.project_root.display(),
            "Config validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn project() -> assert_fs::TempDir {
        let tmp = assert_fs::TempDir::new().unwrap();
        tmp.child("app/build.gradle").write_str("com.example.old").unwrap();
        tmp
    }

    #[test]
    fn valid_project_passes() {
        let tmp = project();
        let cfg = Config::new("com.example.old", "com.example.new", tmp.path());
        cfg.validate().unwrap();
    }

    #[test]
    fn source_file_instead_of_dir_is_fatal() {
        let tmp = project();
        tmp.child("app/src/main/kotlin/com/example/old").write_str("oops").unwrap();
        let cfg = Config::new("com.example.old", "com.example.new", tmp.path());
        assert!(matches!(cfg.validate(), Err(MigrateError::SourceNotDirectory(_))));
    }

    #[test]
    fn missing_descriptor_is_fatal() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let cfg = Config::new("com.example.old", "com.example.new", tmp.path());
        assert!(matches!(cfg.validate(), Err(MigrateError::DescriptorMissing(_))));
    }

    #[test]
    fn identical_identifiers_rejected() {
        let tmp = project();
        let cfg = Config::new("com.example.old", "com.example.old", tmp.path());
        assert!(matches!(cfg.validate(), Err(MigrateError::SameIdentifier(_))));
    }

    #[test]
    fn new_package_inside_old_is_rejected() {
        let tmp = project();
        tmp.child("app/src/main/kotlin/com/example/A.kt").write_str("package com.example").unwrap();
        let cfg = Config::new("com.example", "com.example.v2", tmp.path());
        assert!(matches!(cfg.validate(), Err(MigrateError::NestedPackagePaths { .. })));
    }

    #[test]
    fn old_package_inside_new_is_rejected() {
        let tmp = project();
        let cfg = Config::new("com.example.v2", "com.example", tmp.path());
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, MigrateError::NestedPackagePaths { .. }));
        assert_eq!(err.exit_code(), crate::errors::exit::SETUP);
    }

    #[test]
    fn sibling_prefix_names_are_not_nested() {
        let tmp = project();
        let cfg = Config::new("com.example.app", "com.example.app2", tmp.path());
        cfg.validate().unwrap();
    }

    #[test]
    fn overlapping_extensions_rejected() {
        let tmp = project();
        let mut cfg = Config::new("com.example.old", "com.example.new", tmp.path());
        cfg.binary_extensions.push(".kt".into());
        assert!(matches!(cfg.validate(), Err(MigrateError::ExtensionOverlap(_))));
    }
}
