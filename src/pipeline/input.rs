//! Input resolution: read a `.mus` file into memory.
//!
//! The whole file is read in one call so the handle is closed before parsing
//! starts. I/O failures are mapped to the specific [`MusError`] variants the
//! CLI can give advice for.

use crate::error::MusError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read the source file as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String, MusError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MusError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => MusError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => MusError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Split text at `\n`, `\r\n` or a lone `\r`. A trailing terminator does
/// not yield an empty last line.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let s = rest?;
        match s.find(['\r', '\n']) {
            Some(i) => {
                let len = if s[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&s[i + len..]);
                Some(&s[..i])
            }
            None => {
                rest = None;
                (!s.is_empty()).then_some(s)
            }
        }
    })
}
