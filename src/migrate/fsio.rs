//! Filesystem primitives used by the migration steps.
//!
//! - `describe_io_error`: op + path + platform hint, for logs and reports.
//! - `replace_contents`: temp sibling + rename, keeping the original mode.
//! - `copy_with_metadata` / `preserve_metadata`: `cp -p` style copies; metadata is best-effort.

use filetime::{FileTime, set_file_times};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

use crate::errors::{FileError, MigrateError};

/// Format a human-friendly message with op/path plus a short hint.
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
            libc::ENOENT => Some("path not found"),
            libc::ENOSPC => Some("insufficient space on device"),
            libc::EROFS => Some("read-only filesystem; cannot write here"),
            libc::ENAMETOOLONG => Some("filename or path too long"),
            libc::ELOOP => Some("too many symbolic link levels"),
            libc::EISDIR => Some("is a directory"),
            _ => None,
        };
        if let Some(h) = hint {
            msg.push_str(" — ");
            msg.push_str(h);
        }
        msg.push_str(&format!(" [os code: {code}]"));
        return msg;
    }

    match e.kind() {
        io::ErrorKind::PermissionDenied => msg.push_str(" — permission denied"),
        io::ErrorKind::NotFound => msg.push_str(" — path not found"),
        _ => {}
    }
    msg
}

/// Adapter for `.map_err(...)` in run-level code.
pub fn io_error<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> MigrateError + 'a {
    move |source| MigrateError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}

fn temp_sibling(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let name = format!(".pkg_migrate.{pid}.{nanos}.tmp");
    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}

/// Replace the contents of an existing file via temp sibling + rename, so a
/// crash never leaves it truncated. The original permissions are kept.
pub fn replace_contents(path: &Path, contents: &[u8]) -> Result<(), FileError> {
    replace_contents_io(path, contents).map_err(|e| FileError::Write {
        path: path.to_path_buf(),
        message: describe_io_error("write", path, &e),
    })
}

/// `replace_contents` with the raw io error, for run-level callers.
pub fn replace_contents_io(path: &Path, contents: &[u8]) -> io::Result<()> {
    let original = fs::metadata(path)?;
    let tmp = temp_sibling(path);

    let result = (|| -> io::Result<()> {
        let mut f = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
        f.write_all(contents)?;
        f.sync_all()?;
        drop(f);
        fs::set_permissions(&tmp, original.permissions())?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Write `contents` to `dest` (created or truncated), creating parent directories.
pub fn write_new(dest: &Path, contents: &[u8]) -> Result<(), FileError> {
    let write_err = |op: &str, p: &Path, e: io::Error| FileError::Write {
        path: dest.to_path_buf(),
        message: describe_io_error(op, p, &e),
    };
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| write_err("create directory", parent, e))?;
    }
    fs::write(dest, contents).map_err(|e| write_err("write", dest, e))
}

/// Byte-exact copy followed by best-effort timestamp/permission preservation.
pub fn copy_with_metadata(src: &Path, dest: &Path) -> Result<u64, FileError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| FileError::Write {
            path: dest.to_path_buf(),
            message: describe_io_error("create directory", parent, &e),
        })?;
    }
    let bytes = fs::copy(src, dest).map_err(|e| FileError::Write {
        path: dest.to_path_buf(),
        message: describe_io_error("copy", src, &e),
    })?;
    if let Err(e) = preserve_metadata(src, dest) {
        trace!(error = %e, "metadata not preserved");
    }
    Ok(bytes)
}

/// Copy atime/mtime and (on Unix) mode bits from `src` onto `dest`.
/// Callers treat failure as non-fatal.
pub fn preserve_metadata(src: &Path, dest: &Path) -> Result<(), FileError> {
    let meta_err = |e: io::Error| FileError::Metadata {
        path: dest.to_path_buf(),
        message: e.to_string(),
    };
    let meta = fs::metadata(src).map_err(meta_err)?;

    let mtime = FileTime::from_last_modification_time(&meta);
    let atime = FileTime::from_last_access_time(&meta);
    set_file_times(dest, atime, mtime).map_err(meta_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = meta.permissions().mode() & 0o7777;
        fs::set_permissions(dest, fs::Permissions::from_mode(mode)).map_err(meta_err)?;
    }
    #[cfg(windows)]
    {
        let mut perms = fs::metadata(dest).map_err(meta_err)?.permissions();
        perms.set_readonly(meta.permissions().readonly());
        fs::set_permissions(dest, perms).map_err(meta_err)?;
    }

    trace!(path = %dest.display(), "preserved timestamps and permissions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn replace_contents_leaves_no_temp_behind() {
        let dir = tempdir().unwrap();
        let f = dir.path().join("build.gradle");
        fs::write(&f, "old").unwrap();
        replace_contents(&f, b"new").unwrap();
        assert_eq!(fs::read_to_string(&f).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".pkg_migrate."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn replace_contents_on_missing_file_is_write_error() {
        let dir = tempdir().unwrap();
        let err = replace_contents(&dir.path().join("nope"), b"x").unwrap_err();
        assert!(matches!(err, FileError::Write { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn replace_contents_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let f = dir.path().join("gradlew.properties");
        fs::write(&f, "a").unwrap();
        fs::set_permissions(&f, fs::Permissions::from_mode(0o640)).unwrap();
        replace_contents(&f, b"b").unwrap();
        assert_eq!(fs::metadata(&f).unwrap().permissions().mode() & 0o777, 0o640);
    }

    #[test]
    fn copy_preserves_mtime() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("lib.so");
        let dest = dir.path().join("out").join("lib.so");
        fs::write(&src, [0u8, 1, 2, 255]).unwrap();
        let past = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&src, past).unwrap();
        copy_with_metadata(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), vec![0u8, 1, 2, 255]);
        let got = FileTime::from_last_modification_time(&fs::metadata(&dest).unwrap());
        assert_eq!(got.unix_seconds(), 1_600_000_000);
    }

    #[test]
    fn notfound_message_includes_path() {
        let p = Path::new("/nonexistent/for/test");
        let msg = describe_io_error("open", p, &io::Error::from(io::ErrorKind::NotFound));
        assert!(msg.contains("open"));
        assert!(msg.contains("/nonexistent/for/test"));
        assert!(msg.contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn enospc_hint_present() {
        let msg = describe_io_error("write", Path::new("/tmp"), &io::Error::from_raw_os_error(libc::ENOSPC));
        assert!(msg.contains("insufficient space"), "msg was: {msg}");
        assert!(msg.contains("os code"));
    }
}
