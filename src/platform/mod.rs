//! Platform-specific helpers.
//! Hides Unix/Windows differences for the few places that need secure file creation.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{open_log_file_secure_append, write_config_secure_new_0600};

#[cfg(not(unix))]
pub use windows::{open_log_file_secure_append, write_config_secure_new_0600};
