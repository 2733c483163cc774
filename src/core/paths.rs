//! Shared path manipulation utilities.
//!
//! The index stores paths and basenames as opaque byte sequences, so the
//! conversions here must be lossless on Unix (where filenames are arbitrary
//! bytes) and degrade to lossy UTF-8 elsewhere.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Raw bytes of any OS string, for example a query pattern from argv.
#[cfg(unix)]
pub fn os_bytes(value: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    value.as_bytes().to_vec()
}

/// Raw bytes of any OS string (lossy outside Unix).
#[cfg(not(unix))]
pub fn os_bytes(value: &OsStr) -> Vec<u8> {
    value.to_string_lossy().into_owned().into_bytes()
}

/// Full path as raw bytes.
#[cfg(unix)]
pub fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

/// Full path as raw bytes (lossy outside Unix).
#[cfg(not(unix))]
pub fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

/// Reconstruct a path from stored bytes.
#[cfg(unix)]
pub fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

/// Reconstruct a path from stored bytes (lossy outside Unix).
#[cfg(not(unix))]
pub fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Last path component as raw bytes.
///
/// Empty for paths without a final component, which after canonicalization
/// only happens for a filesystem root.
pub fn basename_bytes(path: &Path) -> Vec<u8> {
    path.file_name().map_or_else(Vec::new, |name| {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            name.as_bytes().to_vec()
        }
        #[cfg(not(unix))]
        {
            name.to_string_lossy().into_owned().into_bytes()
        }
    })
}
