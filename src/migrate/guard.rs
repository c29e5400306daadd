//! Idempotency guard.
//!
//! The descriptor file is rewritten first. If the rewrite is a no-op the
//! project has already been migrated and the run must stop before any
//! destructive step.

use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::decode::decode_lossy;
use super::fsio::{io_error, replace_contents_io};
use super::identifier::Rewriter;
use crate::errors::MigrateError;

/// Apply the identifier substitution to `descriptor`.
/// `Err(AlreadyMigrated)` when nothing changed.
pub fn check_and_apply(descriptor: &Path, rewriter: &Rewriter) -> Result<(), MigrateError> {
    if !descriptor.is_file() {
        return Err(MigrateError::DescriptorMissing(descriptor.to_path_buf()));
    }
    let bytes = fs::read(descriptor).map_err(io_error("read descriptor", descriptor))?;
    let (text, dropped_bytes) = decode_lossy(&bytes);
    if dropped_bytes > 0 {
        warn!(path = %descriptor.display(), dropped_bytes, "Invalid UTF-8 dropped while decoding");
    }

    let rewritten = rewriter.rewrite(&text);
    if rewritten == text.as_str() {
        return Err(MigrateError::AlreadyMigrated(descriptor.to_path_buf()));
    }
    replace_contents_io(descriptor, rewritten.as_bytes())
        .map_err(io_error("write descriptor", descriptor))?;
    info!(path = %descriptor.display(), "Descriptor updated; migration can proceed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::identifier::Identifier;
    use assert_fs::prelude::*;

    #[test]
    fn second_run_reports_already_migrated() {
        let rw = Rewriter::new(&Identifier::new("com.example.old", "com.example.new").unwrap()).unwrap();
        let tmp = assert_fs::TempDir::new().unwrap();
        let gradle = tmp.child("build.gradle");
        gradle.write_str("namespace 'com.example.old'").unwrap();

        check_and_apply(gradle.path(), &rw).unwrap();
        gradle.assert("namespace 'com.example.new'");

        let err = check_and_apply(gradle.path(), &rw).unwrap_err();
        assert!(matches!(err, MigrateError::AlreadyMigrated(_)));
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_descriptor_is_an_io_error() {
        use std::os::unix::fs::PermissionsExt;
        // root bypasses directory permissions
        if unsafe { libc::geteuid() } == 0 {
            eprintln!("skipping: running as root");
            return;
        }
        let rw = Rewriter::new(&Identifier::new("com.example.old", "com.example.new").unwrap()).unwrap();
        let tmp = assert_fs::TempDir::new().unwrap();
        let app = tmp.child("app");
        let gradle = app.child("build.gradle");
        gradle.write_str("namespace 'com.example.old'").unwrap();
        fs::set_permissions(app.path(), fs::Permissions::from_mode(0o555)).unwrap();

        let err = check_and_apply(gradle.path(), &rw).unwrap_err();
        fs::set_permissions(app.path(), fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(err, MigrateError::Io { op: "write descriptor", .. }), "{err}");
        assert_eq!(err.kind(), "io");
        assert_eq!(err.exit_code(), crate::errors::exit::SETUP);
        gradle.assert("namespace 'com.example.old'");
    }

    #[test]
    fn missing_descriptor_is_setup_error() {
        let rw = Rewriter::new(&Identifier::new("a.b", "c.d").unwrap()).unwrap();
        let tmp = assert_fs::TempDir::new().unwrap();
        let err = check_and_apply(&tmp.path().join("build.gradle"), &rw).unwrap_err();
        assert!(matches!(err, MigrateError::DescriptorMissing(_)));
    }
}
