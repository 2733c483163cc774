//! Binary index format: writer primitives and the validated reader.
//!
//! All integers are little-endian `u32`. Strings are length-prefixed raw
//! bytes with no terminator and no encoding validation. Layout:
//!
//! ```text
//! u32  paths_count                 ; backpatched at the end of the build
//! repeat paths_count times:
//!   u32 len ; bytes[len]           ; a canonicalized path
//! u32  files_count
//! repeat files_count times:
//!   u32 path_id
//!   u32 basename_len ; bytes[basename_len]
//! u32  suffixes_count
//! repeat suffixes_count times:
//!   u32 file_id
//!   u32 offset
//! ```
//!
//! Counts above `u32::MAX` are not representable; the indexer refuses to
//! produce them rather than wrapping.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::core::errors::{FlocateError, Result};
use crate::index::descriptors::{FileDescriptor, SuffixDescriptor};

// ──────────────────── writer primitives ────────────────────

/// Write one little-endian u32.
pub fn write_count<W: Write>(out: &mut W, value: u32) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

/// Write a length-prefixed byte string.
pub fn write_bytes<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string exceeds u32 length"))?;
    write_count(out, len)?;
    out.write_all(bytes)
}

/// Write one file descriptor record.
pub fn write_file<W: Write>(out: &mut W, fd: &FileDescriptor) -> io::Result<()> {
    write_count(out, fd.path_id())?;
    write_bytes(out, fd.name())
}

/// Write one suffix descriptor record.
pub fn write_suffix<W: Write>(out: &mut W, sd: &SuffixDescriptor) -> io::Result<()> {
    write_count(out, sd.file_id())?;
    write_count(out, sd.offset())
}

/// Write the two trailing sections: files and suffixes, each count-prefixed.
pub fn write_tail<W: Write>(
    out: &mut W,
    files: &[FileDescriptor],
    suffixes: &[SuffixDescriptor],
) -> io::Result<()> {
    let files_count = u32::try_from(files.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "files count exceeds u32"))?;
    write_count(out, files_count)?;
    for fd in files {
        write_file(out, fd)?;
    }

    let suffixes_count = u32::try_from(suffixes.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "suffixes count exceeds u32"))?;
    write_count(out, suffixes_count)?;
    for sd in suffixes {
        write_suffix(out, sd)?;
    }

    Ok(())
}

/// Seek back to offset 0 and overwrite the paths-count placeholder.
pub fn backpatch_paths_count<W: Write + Seek>(out: &mut W, paths_count: u32) -> io::Result<()> {
    out.seek(SeekFrom::Start(0))?;
    write_count(out, paths_count)?;
    out.flush()
}

// ──────────────────── reader ────────────────────

fn read_count<R: Read>(input: &mut R, what: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    input
        .read_exact(&mut buf)
        .map_err(|e| FlocateError::format(format!("short read in {what}: {e}")))?;
    Ok(u32::from_le_bytes(buf))
}

fn read_bytes<R: Read>(input: &mut R, what: &str) -> Result<Vec<u8>> {
    let len = read_count(input, what)? as usize;

    // The length is untrusted until the payload actually arrives, so read
    // through `take` instead of pre-allocating `len` bytes.
    let mut bytes = Vec::new();
    input
        .by_ref()
        .take(len as u64)
        .read_to_end(&mut bytes)
        .map_err(|e| FlocateError::format(format!("short read in {what}: {e}")))?;
    if bytes.len() != len {
        return Err(FlocateError::format(format!(
            "truncated {what}: expected {len} bytes, found {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

fn read_file<R: Read>(input: &mut R) -> Result<FileDescriptor> {
    let path_id = read_count(input, "file record")?;
    let name = read_bytes(input, "file record")?;
    Ok(FileDescriptor::new(path_id, name))
}

fn read_suffix<R: Read>(input: &mut R) -> Result<SuffixDescriptor> {
    let file_id = read_count(input, "suffix record")?;
    let offset = read_count(input, "suffix record")?;
    Ok(SuffixDescriptor::new(file_id, offset))
}

/// A fully loaded, reference-validated index image.
#[derive(Debug)]
pub struct Index {
    paths: Vec<Vec<u8>>,
    files: Vec<FileDescriptor>,
    suffixes: Vec<SuffixDescriptor>,
}

impl Index {
    /// Assemble an index from in-memory sections, validating every
    /// cross-section reference.
    pub fn new(
        paths: Vec<Vec<u8>>,
        files: Vec<FileDescriptor>,
        suffixes: Vec<SuffixDescriptor>,
    ) -> Result<Self> {
        for (i, fd) in files.iter().enumerate() {
            if fd.path_id() as usize >= paths.len() {
                return Err(FlocateError::format(format!(
                    "file {i} references path {} of {}",
                    fd.path_id(),
                    paths.len()
                )));
            }
        }
        for (i, sd) in suffixes.iter().enumerate() {
            let Some(fd) = files.get(sd.file_id() as usize) else {
                return Err(FlocateError::format(format!(
                    "suffix {i} references file {} of {}",
                    sd.file_id(),
                    files.len()
                )));
            };
            if sd.offset() as usize >= fd.name().len() {
                return Err(FlocateError::format(format!(
                    "suffix {i} offset {} is out of range for a basename of {} bytes",
                    sd.offset(),
                    fd.name().len()
                )));
            }
        }

        Ok(Self {
            paths,
            files,
            suffixes,
        })
    }

    /// Parse the five sections of an index file.
    pub fn load<R: Read>(mut input: R) -> Result<Self> {
        let paths_count = read_count(&mut input, "paths count")?;
        let mut paths = Vec::new();
        for _ in 0..paths_count {
            paths.push(read_bytes(&mut input, "path record")?);
        }

        let files_count = read_count(&mut input, "files count")?;
        let mut files = Vec::new();
        for _ in 0..files_count {
            files.push(read_file(&mut input)?);
        }

        let suffixes_count = read_count(&mut input, "suffixes count")?;
        let mut suffixes = Vec::new();
        for _ in 0..suffixes_count {
            suffixes.push(read_suffix(&mut input)?);
        }

        Self::new(paths, files, suffixes)
    }

    /// Canonicalized path bytes, ordered by `path_id`.
    pub fn paths(&self) -> &[Vec<u8>] {
        &self.paths
    }

    /// File descriptors, ordered by `file_id`.
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// The suffix array, lexicographically sorted by denoted substring.
    pub fn suffixes(&self) -> &[SuffixDescriptor] {
        &self.suffixes
    }
}
