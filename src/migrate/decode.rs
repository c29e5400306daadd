//! Best-effort UTF-8 decoding.
//!
//! Invalid byte sequences are dropped rather than failing the file; callers
//! still see how many bytes were lost. An unreadable file is `Skipped`.

use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Text { text: String, dropped_bytes: usize },
    Skipped { reason: String },
}

impl Decoded {
    pub fn text(&self) -> Option<&str> {
        match self {
            Decoded::Text { text, .. } => Some(text.as_str()),
            Decoded::Skipped { .. } => None,
        }
    }
}

/// Decode bytes, dropping invalid UTF-8 sequences.
pub fn decode_lossy(bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }
    (text, dropped)
}

/// Read `path` and decode it best-effort.
pub fn read_text(path: &Path) -> Decoded {
    match fs::read(path) {
        Ok(bytes) => {
            let (text, dropped_bytes) = decode_lossy(&bytes);
            Decoded::Text { text, dropped_bytes }
        }
        Err(e) => Decoded::Skipped {
            reason: super::fsio::describe_io_error("read", path, &e),
        },
    }
}
